//! The module contains the error the engine can throw.
//!
//! The errors fall into four classes:
//!
//! - [`InvalidArgument`] thrown when a required field is missing or malformed,
//!   before anything is read.
//! - [`KeyNotFound`] thrown when a referenced product or recipe does not exist.
//! - [`InsufficientStock`] thrown when a bucket cannot cover the requested
//!   quantity.
//! - [`Database`] and [`Timeout`] thrown when the store cannot complete an
//!   atomic unit. Nothing of the unit is persisted.
//!
//!  [`InvalidArgument`]: EngineError::InvalidArgument
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InsufficientStock`]: EngineError::InsufficientStock
//!  [`Database`]: EngineError::Database
//!  [`Timeout`]: EngineError::Timeout
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("\"{0}\" is still in use")]
    InUse(String),
    #[error("Timed out after {0} ms")]
    Timeout(u128),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` when the store failed to complete the unit, as opposed
    /// to a business rule rejecting the request.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Timeout(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InsufficientStock(a), Self::InsufficientStock(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InUse(a), Self::InUse(b)) => a == b,
            (Self::Timeout(a), Self::Timeout(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
