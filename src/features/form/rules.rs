//! Field rules - pure validation and the live phone formatter.
//!
//! No document access here: callers hand in the raw value and get back
//! either `Ok(())` or the message to show under the field.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Optional leading `+`, one optional separator, then ten or more digits and
/// separators. The digit count itself is checked against [`PHONE_MIN_DIGITS`].
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\s\-()]?[0-9\s\-()]{10,}$").expect("valid phone pattern"));

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 10;
pub const PHONE_MIN_DIGITS: usize = 10;

// =============================================================================
// FieldKind
// =============================================================================

/// The contact form's required fields, keyed by their `name` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    FirstName,
    LastName,
    Email,
    Phone,
    Message,
}

impl FieldKind {
    pub const ALL: [FieldKind; 5] = [
        FieldKind::FirstName,
        FieldKind::LastName,
        FieldKind::Email,
        FieldKind::Phone,
        FieldKind::Message,
    ];

    /// The control's `name` attribute.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::FirstName => "firstName",
            FieldKind::LastName => "lastName",
            FieldKind::Email => "email",
            FieldKind::Phone => "phone",
            FieldKind::Message => "message",
        }
    }

    /// How the field is referred to in messages.
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::FirstName => "First name",
            FieldKind::LastName => "Last name",
            FieldKind::Email => "Email address",
            FieldKind::Phone => "Phone number",
            FieldKind::Message => "Message",
        }
    }

    /// Id of the element that displays this field's error.
    pub fn error_element_id(self) -> String {
        format!("{}Error", self.name())
    }

    /// Look up a field by its `name` attribute. Controls without a rule
    /// return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        FieldKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Why a field value was rejected. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{label} is required")]
    Required { label: &'static str },

    #[error("{label} must be at least {min} characters")]
    TooShort { label: &'static str, min: usize },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,
}

/// Validate a raw field value. Surrounding whitespace is ignored.
pub fn validate_value(kind: FieldKind, raw: &str) -> Result<(), FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldError::Required { label: kind.label() });
    }

    match kind {
        FieldKind::FirstName | FieldKind::LastName => min_chars(kind, value, NAME_MIN_CHARS),
        FieldKind::Message => min_chars(kind, value, MESSAGE_MIN_CHARS),
        FieldKind::Email if !EMAIL_PATTERN.is_match(value) => Err(FieldError::InvalidEmail),
        FieldKind::Email => Ok(()),
        FieldKind::Phone => {
            let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
            let digits = compact.chars().filter(char::is_ascii_digit).count();
            if digits >= PHONE_MIN_DIGITS && PHONE_PATTERN.is_match(&compact) {
                Ok(())
            } else {
                Err(FieldError::InvalidPhone)
            }
        }
    }
}

fn min_chars(kind: FieldKind, value: &str, min: usize) -> Result<(), FieldError> {
    if value.chars().count() < min {
        Err(FieldError::TooShort {
            label: kind.label(),
            min,
        })
    } else {
        Ok(())
    }
}

// =============================================================================
// Phone formatter
// =============================================================================

/// Rewrite typed input as `(xxx) xxx-xxxx`, keeping at most ten digits.
///
/// Non-digits are dropped; partial input yields partial groups.
pub fn format_phone(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_MAX_DIGITS)
        .collect();

    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({digits}"),
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn message(kind: FieldKind, value: &str) -> Option<String> {
        validate_value(kind, value).err().map(|e| e.to_string())
    }

    #[test]
    fn test_required_messages() {
        assert_eq!(message(FieldKind::FirstName, "  ").as_deref(), Some("First name is required"));
        assert_eq!(message(FieldKind::LastName, "").as_deref(), Some("Last name is required"));
        assert_eq!(message(FieldKind::Email, "").as_deref(), Some("Email address is required"));
        assert_eq!(message(FieldKind::Phone, "").as_deref(), Some("Phone number is required"));
        assert_eq!(message(FieldKind::Message, "").as_deref(), Some("Message is required"));
    }

    #[test]
    fn test_length_rules() {
        assert_eq!(
            message(FieldKind::FirstName, "A").as_deref(),
            Some("First name must be at least 2 characters")
        );
        assert_eq!(message(FieldKind::LastName, " Li ").as_deref(), None);
        assert_eq!(
            message(FieldKind::Message, "too short").as_deref(),
            Some("Message must be at least 10 characters")
        );
        assert_eq!(message(FieldKind::Message, "long enough!").as_deref(), None);
    }

    #[test]
    fn test_email_rule() {
        assert_eq!(validate_value(FieldKind::Email, "a@b"), Err(FieldError::InvalidEmail));
        assert_eq!(validate_value(FieldKind::Email, "a@b.com"), Ok(()));
        assert_eq!(validate_value(FieldKind::Email, "a b@c.com"), Err(FieldError::InvalidEmail));
        assert_eq!(validate_value(FieldKind::Email, "a@@b.com"), Err(FieldError::InvalidEmail));
    }

    #[test]
    fn test_phone_rule_ignores_whitespace() {
        assert_eq!(
            validate_value(FieldKind::Phone, "123 456 7890"),
            validate_value(FieldKind::Phone, "1234567890")
        );
        assert_eq!(validate_value(FieldKind::Phone, "1234567890"), Ok(()));
        assert_eq!(validate_value(FieldKind::Phone, "(555) 123-4567"), Ok(()));
        assert_eq!(validate_value(FieldKind::Phone, "+1 555 123 4567"), Ok(()));
        assert_eq!(validate_value(FieldKind::Phone, "12345"), Err(FieldError::InvalidPhone));
        assert_eq!(validate_value(FieldKind::Phone, "555-CALL-NOW"), Err(FieldError::InvalidPhone));
        // Separators do not count toward the ten digits.
        assert_eq!(validate_value(FieldKind::Phone, "----------"), Err(FieldError::InvalidPhone));
        assert_eq!(validate_value(FieldKind::Phone, "(((((((((("), Err(FieldError::InvalidPhone));
        assert_eq!(validate_value(FieldKind::Phone, "(555) 123-45"), Err(FieldError::InvalidPhone));
    }

    #[test]
    fn test_field_kind_from_name() {
        assert_eq!(FieldKind::from_name("email"), Some(FieldKind::Email));
        assert_eq!(FieldKind::from_name("company"), None);
        assert_eq!(FieldKind::Phone.error_element_id(), "phoneError");
    }

    #[test]
    fn test_format_phone_groups() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("abc"), "");
        assert_eq!(format_phone("5"), "(5");
        assert_eq!(format_phone("555"), "(555");
        assert_eq!(format_phone("5551"), "(555) 1");
        assert_eq!(format_phone("555123"), "(555) 123");
        assert_eq!(format_phone("5551234"), "(555) 123-4");
        assert_eq!(format_phone("(555) 123-45678"), "(555) 123-4567");
        assert_eq!(format_phone("555123456789"), "(555) 123-4567");
    }
}
