use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::notifications;

use super::notifications_model::{NewNotification, Notification, NotificationDB};

/// Contract for the notification sink.
///
/// Jobs stage notifications with `insert_in_tx` so they commit with the
/// state change that triggered them.
pub trait NotificationRepositoryTrait: Send + Sync {
    fn insert(&self, notification: NewNotification) -> Result<Notification>;
    fn insert_in_tx(
        &self,
        conn: &mut SqliteConnection,
        notification: NewNotification,
    ) -> Result<Notification>;
    fn list_for_user(&self, user_id: &str, unread_only: bool) -> Result<Vec<Notification>>;
    fn mark_read(&self, notification_id: &str) -> Result<()>;
}

pub struct NotificationRepository {
    pool: Arc<DbPool>,
}

impl NotificationRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn build_row(notification: NewNotification) -> NotificationDB {
        NotificationDB {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            product_id: notification.product_id,
            read: false,
            created_at: Utc::now().naive_utc(),
        }
    }
}

impl NotificationRepositoryTrait for NotificationRepository {
    fn insert(&self, notification: NewNotification) -> Result<Notification> {
        let mut conn = get_connection(&self.pool)?;
        let row = Self::build_row(notification);
        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)?;
        Ok(row.into())
    }

    fn insert_in_tx(
        &self,
        conn: &mut SqliteConnection,
        notification: NewNotification,
    ) -> Result<Notification> {
        let row = Self::build_row(notification);
        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(conn)?;
        Ok(row.into())
    }

    fn list_for_user(&self, user_id: &str, unread_only: bool) -> Result<Vec<Notification>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .into_boxed();
        if unread_only {
            query = query.filter(notifications::read.eq(false));
        }

        query
            .order(notifications::created_at.desc())
            .load::<NotificationDB>(&mut conn)
            .map(|results| results.into_iter().map(Notification::from).collect())
            .map_err(Error::from)
    }

    fn mark_read(&self, notification_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::update(notifications::table.find(notification_id))
            .set(notifications::read.eq(true))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(Error::NotFound(format!(
                "Notification with id {} not found",
                notification_id
            )));
        }

        Ok(())
    }
}
