//! In-memory [`Store`] implementation for tests.
//!
//! Rows live in a `BTreeMap` keyed by id behind a `tokio::sync::RwLock`,
//! so iteration order is insertion order. Uniqueness is checked under the
//! write lock, which makes insert and update atomic with respect to each
//! other.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, UniqueField};
use crate::models::{Contact, NewContact};

use super::{Store, StoreResult};

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i64, Contact>,
    last_id: i64,
}

impl Inner {
    fn find_conflict(&self, contact: &NewContact, exclude: Option<i64>) -> Option<UniqueField> {
        let others = self.rows.values().filter(|c| Some(c.id) != exclude);
        for c in others {
            if c.email == contact.email {
                return Some(UniqueField::Email);
            }
            if c.phone == contact.phone {
                return Some(UniqueField::Phone);
            }
        }
        None
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert(&self, contact: &NewContact) -> StoreResult<Contact> {
        let mut inner = self.inner.write().await;
        if let Some(field) = inner.find_conflict(contact, None) {
            return Err(StoreError::Duplicate(field));
        }
        inner.last_id += 1;
        let stored = contact.clone().into_contact(inner.last_id);
        inner.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Contact>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn get_by_email(
        &self,
        email: &str,
        exclude: Option<i64>,
    ) -> StoreResult<Option<Contact>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .values()
            .find(|c| c.email == email && Some(c.id) != exclude)
            .cloned())
    }

    async fn get_by_phone(
        &self,
        phone: &str,
        exclude: Option<i64>,
    ) -> StoreResult<Option<Contact>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .values()
            .find(|c| c.phone == phone && Some(c.id) != exclude)
            .cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<(Vec<Contact>, i64)> {
        let inner = self.inner.read().await;
        let contacts = inner
            .rows
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((contacts, inner.rows.len() as i64))
    }

    async fn update(&self, id: i64, contact: &NewContact) -> StoreResult<Option<Contact>> {
        let mut inner = self.inner.write().await;
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(field) = inner.find_conflict(contact, Some(id)) {
            return Err(StoreError::Duplicate(field));
        }
        let updated = contact.clone().into_contact(id);
        inner.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}
