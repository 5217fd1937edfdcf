//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when the addressed wallet does not exist.
//! - [`Forbidden`] thrown when a [`Caller`] may not touch a wallet.
//! - [`TransferRejected`] thrown when a transfer fails one of its checks.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`TransferRejected`]: EngineError::TransferRejected
//!  [`Caller`]: crate::Caller
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Transfer rejected: {0}")]
    TransferRejected(#[from] TransferRejection),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::TransferRejected(a), Self::TransferRejected(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Why a transfer was not applied.
///
/// The reason is only reported internally: on the wire every rejection is
/// the same client-error code.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum TransferRejection {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("sender and receiver are the same account")]
    SameAccount,
    #[error("sender not found")]
    SenderNotFound,
    #[error("sender disabled or not enough money")]
    InsufficientFundsOrDisabled,
    #[error("receiver not found")]
    ReceiverNotFound,
    #[error("receiver not enabled")]
    ReceiverDisabled,
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl From<DbErr> for TransferRejection {
    fn from(value: DbErr) -> Self {
        Self::PersistenceFailure(value.to_string())
    }
}
