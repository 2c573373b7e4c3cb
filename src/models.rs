//! Core data models for the contact book.
//!
//! [`Contact`] is the persisted row. [`ContactInput`] is the loosely-typed
//! request payload as received from clients, and [`NewContact`] is the
//! validated form that the store accepts.

use serde::{Deserialize, Deserializer, Serialize};

/// A stored contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Validated contact fields, ready to be written by a [`Store`](crate::store::Store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewContact {
    pub(crate) fn into_contact(self, id: i64) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
        }
    }
}

/// Raw create/update payload.
///
/// Every field is optional so that a missing field can be reported as a
/// validation failure rather than a deserialization error. Only a JSON
/// object supplies fields; any other JSON value yields an empty input.
/// Numbers are accepted and converted to their decimal text, which lets
/// clients send `"phone": 1234567890`. Falsy values (`null`, `false`, `0`)
/// count as absent.
#[derive(Debug, Clone, Default)]
pub struct ContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
        }
    }

    /// Build an input from an arbitrary JSON value.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value.as_object() {
            Some(fields) => Self {
                name: fields.get("name").and_then(lenient_text),
                email: fields.get("email").and_then(lenient_text),
                phone: fields.get("phone").and_then(lenient_text),
            },
            None => Self::default(),
        }
    }
}

impl<'de> Deserialize<'de> for ContactInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

/// One page of contacts plus the total row count.
///
/// Serializes to the `{ "contacts": [...], "total": n }` shape consumed by
/// the front-end, which derives the page count as `ceil(total / limit)`.
#[derive(Debug, Clone, Serialize)]
pub struct ContactPage {
    pub contacts: Vec<Contact>,
    pub total: i64,
}

fn lenient_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => number_text(n),
        serde_json::Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Decimal text of a JSON number; zero is falsy and yields `None`.
/// Integral floats render without a fractional part (`1234567890.0`
/// becomes `"1234567890"`).
fn number_text(n: &serde_json::Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return (i != 0).then(|| i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }
    let f = n.as_f64()?;
    if f == 0.0 {
        None
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        Some(format!("{:.0}", f))
    } else {
        Some(f.to_string())
    }
}
