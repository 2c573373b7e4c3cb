//! Input validation shared by create and update.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{ContactInput, NewContact};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("Failed to compile email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("Failed to compile phone regex"));

pub const MISSING_FIELDS: &str = "Name, email, and phone are required.";
pub const INVALID_EMAIL: &str = "Invalid email format.";
pub const INVALID_PHONE: &str = "Phone must be 10 digits.";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// Check a raw payload and turn it into a [`NewContact`].
///
/// Checks run in a fixed order: presence of all three fields, then the
/// email pattern, then the phone pattern. The first failure wins.
pub fn validate_contact(input: &ContactInput) -> ServiceResult<NewContact> {
    let (name, email, phone) = match (
        present(&input.name),
        present(&input.email),
        present(&input.phone),
    ) {
        (Some(n), Some(e), Some(p)) => (n, e, p),
        _ => return Err(ServiceError::Validation(MISSING_FIELDS.to_string())),
    };

    if !is_valid_email(email) {
        return Err(ServiceError::Validation(INVALID_EMAIL.to_string()));
    }
    if !is_valid_phone(phone) {
        return Err(ServiceError::Validation(INVALID_PHONE.to_string()));
    }

    Ok(NewContact {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: ServiceResult<NewContact>) -> String {
        match result {
            Err(ServiceError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_contact() {
        let c = validate_contact(&ContactInput::new("Ana", "ana@x.com", "1234567890")).unwrap();
        assert_eq!(c.name, "Ana");
        assert_eq!(c.email, "ana@x.com");
        assert_eq!(c.phone, "1234567890");
    }

    #[test]
    fn test_missing_fields() {
        let mut input = ContactInput::new("Ana", "ana@x.com", "1234567890");
        input.email = None;
        assert_eq!(message(validate_contact(&input)), MISSING_FIELDS);

        let input = ContactInput::new("", "ana@x.com", "1234567890");
        assert_eq!(message(validate_contact(&input)), MISSING_FIELDS);

        let input = ContactInput::new("   ", "ana@x.com", "1234567890");
        assert_eq!(message(validate_contact(&input)), MISSING_FIELDS);

        assert_eq!(
            message(validate_contact(&ContactInput::default())),
            MISSING_FIELDS
        );
    }

    #[test]
    fn test_missing_beats_format() {
        let input = ContactInput::new("", "not-an-email", "12");
        assert_eq!(message(validate_contact(&input)), MISSING_FIELDS);
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("ana@x.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("ana@x"));
        assert!(!is_valid_email("ana.x.com"));
        assert!(!is_valid_email("ana @x.com"));
        assert!(!is_valid_email("@x.com"));

        let input = ContactInput::new("Ana", "ana@x", "1234567890");
        assert_eq!(message(validate_contact(&input)), INVALID_EMAIL);
    }

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("0123456789"));
        assert!(!is_valid_phone("123456789"));
        assert!(!is_valid_phone("12345678901"));
        assert!(!is_valid_phone("12345abcde"));
        assert!(!is_valid_phone("123-456-78"));
        // Non-ASCII digits are not accepted.
        assert!(!is_valid_phone("١٢٣٤٥٦٧٨٩٠"));

        let input = ContactInput::new("Ana", "ana@x.com", "123456789");
        assert_eq!(message(validate_contact(&input)), INVALID_PHONE);
    }
}
