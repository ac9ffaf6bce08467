//! Notification models.
//!
//! Notifications are enqueued by jobs and services; the UI collaborator
//! consumes them and flips `read`.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification kind tags used by the core jobs.
pub const NOTIFICATION_KIND_PRODUCT_ARCHIVED: &str = "product_archived";
pub const NOTIFICATION_KIND_DEADLINE_EXTENDED: &str = "deadline_extended";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub product_id: Option<String>,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub product_id: Option<String>,
}

/// Database model for notifications
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotificationDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub product_id: Option<String>,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

impl From<NotificationDB> for Notification {
    fn from(db: NotificationDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            message: db.message,
            kind: db.kind,
            product_id: db.product_id,
            read: db.read,
            created_at: db.created_at,
        }
    }
}
