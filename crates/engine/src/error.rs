//! The error type shared by every engine operation.
//!
//! Lookups that cross an owner boundary are deliberately **not** errors: the
//! write paths treat them as "nothing to do" and return an empty result, so
//! bulk callers can skip missing counters without aborting a whole batch.
//! The variants here cover genuine failures only.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid time frame: {0}")]
    InvalidTimeFrame(String),
    #[error("empty transaction batch")]
    EmptyBatch,
    #[error("attachment store: {0}")]
    Attachment(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidTimeFrame(a), Self::InvalidTimeFrame(b)) => a == b,
            (Self::EmptyBatch, Self::EmptyBatch) => true,
            (Self::Attachment(a), Self::Attachment(b)) => a.kind() == b.kind(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
