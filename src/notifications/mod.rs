// Module declarations
pub(crate) mod notifications_model;
pub(crate) mod notifications_repository;

// Re-export the public interface
pub use notifications_model::{
    NewNotification, Notification, NotificationDB, NOTIFICATION_KIND_DEADLINE_EXTENDED,
    NOTIFICATION_KIND_PRODUCT_ARCHIVED,
};
pub use notifications_repository::{NotificationRepository, NotificationRepositoryTrait};
