//! The module contains the error the engine can throw.
//!
//! Every variant belongs to one family of failures:
//!
//! - invalid input ([`InvalidAmount`], [`InvalidAction`], [`InvalidField`],
//!   [`InvalidCursor`]), detected before touching the store;
//! - missing references ([`KeyNotFound`]);
//! - rejected state changes ([`InsufficientFunds`], [`ExistingKey`],
//!   [`Conflict`]);
//! - failed logins ([`InvalidCredentials`]);
//! - storage failures ([`Database`]).
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidAction`]: EngineError::InvalidAction
//!  [`InvalidField`]: EngineError::InvalidField
//!  [`InvalidCursor`]: EngineError::InvalidCursor
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Conflict`]: EngineError::Conflict
//!  [`InvalidCredentials`]: EngineError::InvalidCredentials
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidAction(a), Self::InvalidAction(b)) => a == b,
            (Self::InvalidField(a), Self::InvalidField(b)) => a == b,
            (Self::InvalidCursor(a), Self::InvalidCursor(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
