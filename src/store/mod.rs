//! Storage abstraction for contacts.
//!
//! The [`Store`] trait defines every storage operation the contact service
//! needs, so the service can run against SQLite in production and against a
//! fresh in-memory store in tests.
//!
//! A store owns exactly two guarantees: identity assignment (ids increase
//! and are never reused) and uniqueness of `email` and `phone`. All other
//! business rules live in the service.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Contact, NewContact};

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Abstract storage backend for contacts.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert`](Store::insert) | Append a row and assign its id |
/// | [`get_by_id`](Store::get_by_id) | Fetch one contact by id |
/// | [`get_by_email`](Store::get_by_email) | Conflict lookup on email |
/// | [`get_by_phone`](Store::get_by_phone) | Conflict lookup on phone |
/// | [`list`](Store::list) | One window of contacts plus the total count |
/// | [`update`](Store::update) | Overwrite a row in place |
/// | [`delete_by_id`](Store::delete_by_id) | Remove a row |
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new contact and return it with its assigned id.
    ///
    /// Fails with [`StoreError::Duplicate`] if the email or phone is taken.
    async fn insert(&self, contact: &NewContact) -> StoreResult<Contact>;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Contact>>;

    /// Find the contact using `email`, ignoring the row with id `exclude`.
    async fn get_by_email(&self, email: &str, exclude: Option<i64>)
        -> StoreResult<Option<Contact>>;

    /// Find the contact using `phone`, ignoring the row with id `exclude`.
    async fn get_by_phone(&self, phone: &str, exclude: Option<i64>)
        -> StoreResult<Option<Contact>>;

    /// Return up to `limit` contacts starting at `offset`, ordered by id,
    /// together with the total number of stored contacts.
    async fn list(&self, limit: i64, offset: i64) -> StoreResult<(Vec<Contact>, i64)>;

    /// Overwrite the fields of contact `id`. Returns `None` if no such row.
    async fn update(&self, id: i64, contact: &NewContact) -> StoreResult<Option<Contact>>;

    /// Delete contact `id`. Returns `false` if no row matched.
    async fn delete_by_id(&self, id: i64) -> StoreResult<bool>;
}
