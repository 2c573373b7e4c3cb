//! Error types for the contact book.
//!
//! [`StoreError`] is produced by storage backends; [`ServiceError`] is the
//! taxonomy returned by [`ContactService`](crate::service::ContactService)
//! and mapped onto HTTP status codes by the server.

use std::fmt;

use thiserror::Error;

/// Column guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Phone,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Email => f.write_str("email"),
            UniqueField::Phone => f.write_str("phone"),
        }
    }
}

/// Errors raised by a [`Store`](crate::store::Store) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write was rejected by a unique constraint.
    #[error("unique constraint violated on {0}")]
    Duplicate(UniqueField),

    /// Underlying database failure.
    #[error("storage failure: {0}")]
    Backend(#[from] sqlx::Error),
}

impl StoreError {
    /// Translate a SQLite error, recognising unique-constraint violations on
    /// the contacts table.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let msg = db_err.message();
                if msg.contains("contacts.email") {
                    return StoreError::Duplicate(UniqueField::Email);
                }
                if msg.contains("contacts.phone") {
                    return StoreError::Duplicate(UniqueField::Phone);
                }
            }
        }
        StoreError::Backend(err)
    }
}

/// Errors returned by the contact service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Email or phone already belongs to another contact.
    #[error("{0}")]
    Conflict(String),

    /// No contact has the requested id.
    #[error("Contact not found")]
    NotFound,

    /// Storage failure. The cause is logged, never shown to clients.
    #[error("storage error: {0}")]
    Storage(#[source] StoreError),
}

impl ServiceError {
    /// Message safe to return to a client.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Storage(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
