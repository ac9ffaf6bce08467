// Module declarations
pub(crate) mod wallets_model;
pub(crate) mod wallets_repository;
pub(crate) mod wallets_traits;

// Re-export the public interface
pub use wallets_model::{NewWallet, Wallet, WalletDB};
pub use wallets_repository::WalletRepository;
pub use wallets_traits::WalletRepositoryTrait;
