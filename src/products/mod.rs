// Module declarations
pub(crate) mod products_model;
pub(crate) mod products_repository;
pub(crate) mod products_traits;

// Re-export the public interface
pub use products_model::{
    ExtensionRecord, NewProduct, Product, ProductDB, ProductStatus, ARCHIVE_REASON_GOAL_NOT_MET,
};
pub use products_repository::ProductRepository;
pub use products_traits::ProductRepositoryTrait;
