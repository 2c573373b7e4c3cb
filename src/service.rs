//! Contact service: validation, duplicate detection, and pagination.
//!
//! [`ContactService`] is stateless apart from the injected [`Store`]. Every
//! mutating operation validates its input and checks for conflicts before
//! writing, so a rejected request leaves the store untouched. The
//! conflict pre-checks are not atomic with the write that follows; the
//! store's own uniqueness guarantee catches the race and is reported with
//! the same conflict message.

use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult, StoreError, UniqueField};
use crate::models::{Contact, ContactInput, ContactPage, NewContact};
use crate::store::Store;
use crate::validate::validate_contact;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Whether a conflict arose while creating or while updating, which
/// selects the wording of the conflict message.
#[derive(Debug, Clone, Copy)]
enum WriteKind {
    Create,
    Update,
}

fn conflict(field: UniqueField, kind: WriteKind) -> ServiceError {
    let msg = match (field, kind) {
        (UniqueField::Email, WriteKind::Create) => "Email already registered.",
        (UniqueField::Phone, WriteKind::Create) => "Phone number already registered.",
        (UniqueField::Email, WriteKind::Update) => "Email already registered to another contact.",
        (UniqueField::Phone, WriteKind::Update) => {
            "Phone number already registered to another contact."
        }
    };
    ServiceError::Conflict(msg.to_string())
}

fn storage(kind: WriteKind) -> impl Fn(StoreError) -> ServiceError {
    move |err| match err {
        StoreError::Duplicate(field) => conflict(field, kind),
        other => ServiceError::Storage(other),
    }
}

/// Parse a pagination parameter the way browsers' `parseInt` does: skip
/// leading whitespace, accept an optional sign, then read leading digits.
/// Anything that yields no digits, zero, or a negative number falls back to
/// `default`.
pub fn parse_positive(raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw else {
        return default;
    };
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(n) if !negative && n > 0 => n,
        Ok(_) => default,
        // Overflowing digit runs are still a positive number.
        Err(_) if end > 0 && !negative => i64::MAX,
        Err(_) => default,
    }
}

/// Business rules for contacts on top of a [`Store`].
#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn Store>,
}

impl ContactService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Validate and persist a new contact.
    pub async fn create(&self, input: &ContactInput) -> ServiceResult<Contact> {
        let contact = validate_contact(input)?;
        self.check_conflicts(&contact, None, WriteKind::Create).await?;

        let created = self
            .store
            .insert(&contact)
            .await
            .map_err(storage(WriteKind::Create))?;

        tracing::info!(id = created.id, "contact created");
        Ok(created)
    }

    /// Return one page of contacts in creation order plus the total count.
    ///
    /// `page` and `limit` are the raw query-string values.
    pub async fn list(
        &self,
        page: Option<&str>,
        limit: Option<&str>,
    ) -> ServiceResult<ContactPage> {
        let page = parse_positive(page, DEFAULT_PAGE);
        let limit = parse_positive(limit, DEFAULT_LIMIT);
        let offset = (page - 1).saturating_mul(limit);

        let (contacts, total) = self
            .store
            .list(limit, offset)
            .await
            .map_err(ServiceError::Storage)?;

        Ok(ContactPage { contacts, total })
    }

    /// Validate and overwrite contact `id`.
    ///
    /// A contact may keep its own email and phone; only other contacts'
    /// values count as conflicts.
    pub async fn update(&self, id: i64, input: &ContactInput) -> ServiceResult<Contact> {
        let contact = validate_contact(input)?;

        if self
            .store
            .get_by_id(id)
            .await
            .map_err(ServiceError::Storage)?
            .is_none()
        {
            return Err(ServiceError::NotFound);
        }

        self.check_conflicts(&contact, Some(id), WriteKind::Update).await?;

        let updated = self
            .store
            .update(id, &contact)
            .await
            .map_err(storage(WriteKind::Update))?
            .ok_or(ServiceError::NotFound)?;

        tracing::info!(id, "contact updated");
        Ok(updated)
    }

    /// Delete contact `id`. Deleting an absent id reports `NotFound`, so a
    /// repeated delete of the same id fails the second time.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let deleted = self
            .store
            .delete_by_id(id)
            .await
            .map_err(ServiceError::Storage)?;

        if !deleted {
            return Err(ServiceError::NotFound);
        }
        tracing::info!(id, "contact deleted");
        Ok(())
    }

    async fn check_conflicts(
        &self,
        contact: &NewContact,
        exclude: Option<i64>,
        kind: WriteKind,
    ) -> ServiceResult<()> {
        if self
            .store
            .get_by_email(&contact.email, exclude)
            .await
            .map_err(ServiceError::Storage)?
            .is_some()
        {
            return Err(conflict(UniqueField::Email, kind));
        }
        if self
            .store
            .get_by_phone(&contact.phone, exclude)
            .await
            .map_err(ServiceError::Storage)?
            .is_some()
        {
            return Err(conflict(UniqueField::Phone, kind));
        }
        Ok(())
    }
}
