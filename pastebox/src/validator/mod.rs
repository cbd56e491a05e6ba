//! Form validation rules and the error accumulator they feed.
//!
//! Rules are plain predicates; a [`Validation`] value collects the failures
//! for one submitted form. Field errors keep only the first failure per
//! field so the user sees one actionable message at a time.

use regex::Regex;
use std::sync::LazyLock;

// The HTML5 email pattern (WHATWG). Deliberately looser than RFC 5322.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("Email pattern must compile")
});

/// True when the value contains at least one non-whitespace character.
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// True when the value is at most `n` characters long. Counted in characters,
/// not bytes, so multi-byte input is not penalized.
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

/// True when the value is at least `n` characters long.
pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

/// True when the value is one of the permitted alternatives.
pub fn permitted_value<T: PartialEq>(value: T, permitted: &[T]) -> bool {
    permitted.contains(&value)
}

/// True when the value looks like an email address.
pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Accumulated validation failures for one form submission.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    field_errors: Vec<(String, String)>,
    non_field_errors: Vec<String>,
}

impl Validation {
    /// True when no failure has been recorded.
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Record `message` against `field` when `ok` is false, unless the field
    /// already has an error.
    pub fn check_field(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_first_field_error(field, message);
        }
    }

    /// Record an error against a field unconditionally.
    pub fn add_field_error(&mut self, field: &str, message: &str) {
        self.field_errors
            .push((field.to_string(), message.to_string()));
    }

    /// Record an error that belongs to the form as a whole.
    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_string());
    }

    fn add_first_field_error(&mut self, field: &str, message: &str) {
        if self.field_error(field).is_none() {
            self.add_field_error(field, message);
        }
    }

    /// The recorded error for `field`, if any.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, msg)| msg.as_str())
    }

    /// Errors that are not tied to a single field.
    pub fn non_field_errors(&self) -> &[String] {
        &self.non_field_errors
    }
}
