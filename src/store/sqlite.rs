//! SQLite-backed [`Store`] implementation.
//!
//! Every operation is a single statement against the `contacts` table (plus
//! a `COUNT(*)` for listing). Unique-constraint failures raised by SQLite
//! are translated into [`StoreError::Duplicate`], so two racing writers can
//! never both persist the same email or phone.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error::StoreError;
use crate::models::{Contact, NewContact};

use super::{Store, StoreResult};

/// SQLite implementation of the [`Store`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_contact(row: &SqliteRow) -> Contact {
    Contact {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert(&self, contact: &NewContact) -> StoreResult<Contact> {
        let result = sqlx::query("INSERT INTO contacts (name, email, phone) VALUES (?, ?, ?)")
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        Ok(contact.clone().into_contact(result.last_insert_rowid()))
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Contact>> {
        let row = sqlx::query("SELECT id, name, email, phone FROM contacts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(row_to_contact))
    }

    async fn get_by_email(
        &self,
        email: &str,
        exclude: Option<i64>,
    ) -> StoreResult<Option<Contact>> {
        let row = sqlx::query(
            "SELECT id, name, email, phone FROM contacts WHERE email = ? AND (? IS NULL OR id != ?) LIMIT 1",
        )
        .bind(email)
        .bind(exclude)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_contact))
    }

    async fn get_by_phone(
        &self,
        phone: &str,
        exclude: Option<i64>,
    ) -> StoreResult<Option<Contact>> {
        let row = sqlx::query(
            "SELECT id, name, email, phone FROM contacts WHERE phone = ? AND (? IS NULL OR id != ?) LIMIT 1",
        )
        .bind(phone)
        .bind(exclude)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_contact))
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<(Vec<Contact>, i64)> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone FROM contacts ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.iter().map(row_to_contact).collect(), total))
    }

    async fn update(&self, id: i64, contact: &NewContact) -> StoreResult<Option<Contact>> {
        let result = sqlx::query("UPDATE contacts SET name = ?, email = ?, phone = ? WHERE id = ?")
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(contact.clone().into_contact(id)))
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
