use diesel::result::Error as DieselError;
use rust_decimal::Decimal;
use std::num::ParseFloatError;
use thiserror::Error;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the settlement and reconciliation core.
///
/// Each variant maps to a stable externally visible error code via
/// [`Error::code`], so callers (API layer, schedulers) can branch on the
/// failure class without string matching.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication required: {0}")]
    Authentication(String),

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation not allowed in current state: {0}")]
    Precondition(String),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable code for external callers.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation-error",
            Error::Authentication(_) => "authentication-error",
            Error::Authorization(_) => "authorization-error",
            Error::NotFound(_) => "not-found",
            Error::Precondition(_) => "precondition-error",
            Error::InsufficientFunds { .. } => "insufficient-funds",
            Error::Database(_) | Error::Internal(_) => "internal-error",
        }
    }
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(#[from] diesel::result::ConnectionError),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(#[from] r2d2::Error),

    #[error("Database query failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

// Implement From for DieselError to Error directly
impl From<DieselError> for Error {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Error::NotFound("Record not found".to_string()),
            _ => Error::Database(DatabaseError::QueryFailed(err)),
        }
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Error::Database(DatabaseError::PoolCreationFailed(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            Error::Authentication("no caller".into()).code(),
            "authentication-error"
        );
        assert_eq!(Error::NotFound("wallet".into()).code(), "not-found");
        assert_eq!(
            Error::Precondition("archived".into()).code(),
            "precondition-error"
        );
        assert_eq!(
            Error::InsufficientFunds {
                requested: dec!(100),
                available: dec!(50)
            }
            .code(),
            "insufficient-funds"
        );
        assert_eq!(Error::Internal("boom".into()).code(), "internal-error");
    }

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        let err: Error = DieselError::NotFound.into();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.code(), "not-found");
    }
}
