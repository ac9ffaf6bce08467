use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde_json::Value;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::system_logs;

use super::system_logs_model::{SystemLog, SystemLogDB};

/// Contract for the append-only job audit log.
pub trait SystemLogRepositoryTrait: Send + Sync {
    fn insert(&self, log_type: &str, payload: Value) -> Result<SystemLog>;
    fn insert_in_tx(
        &self,
        conn: &mut SqliteConnection,
        log_type: &str,
        payload: Value,
    ) -> Result<SystemLog>;
    fn list_recent(&self, limit: i64) -> Result<Vec<SystemLog>>;
}

pub struct SystemLogRepository {
    pool: Arc<DbPool>,
}

impl SystemLogRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn build_row(log_type: &str, payload: &Value) -> SystemLogDB {
        SystemLogDB {
            id: uuid::Uuid::new_v4().to_string(),
            log_type: log_type.to_string(),
            payload: payload.to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

impl SystemLogRepositoryTrait for SystemLogRepository {
    fn insert(&self, log_type: &str, payload: Value) -> Result<SystemLog> {
        let mut conn = get_connection(&self.pool)?;
        let row = Self::build_row(log_type, &payload);
        diesel::insert_into(system_logs::table)
            .values(&row)
            .execute(&mut conn)?;
        Ok(row.into())
    }

    fn insert_in_tx(
        &self,
        conn: &mut SqliteConnection,
        log_type: &str,
        payload: Value,
    ) -> Result<SystemLog> {
        let row = Self::build_row(log_type, &payload);
        diesel::insert_into(system_logs::table)
            .values(&row)
            .execute(conn)?;
        Ok(row.into())
    }

    fn list_recent(&self, limit: i64) -> Result<Vec<SystemLog>> {
        let mut conn = get_connection(&self.pool)?;
        system_logs::table
            .order(system_logs::created_at.desc())
            .limit(limit)
            .load::<SystemLogDB>(&mut conn)
            .map(|results| results.into_iter().map(SystemLog::from).collect())
            .map_err(Error::from)
    }
}
