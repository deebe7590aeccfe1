//! Form Validation
//!
//! A [`Validator`] collects field-level and non-field error messages while a
//! form checks its rules. Rules are plain predicates; every rule is evaluated,
//! so a single submission reports all of its problems at once.
//!
//! ```rust
//! use kernel::validator::{Validator, max_chars, not_blank};
//!
//! let mut v = Validator::default();
//! v.check_field(not_blank(""), "title", "This field cannot be empty");
//! v.check_field(max_chars("ok", 140), "title", "Too long");
//! assert!(!v.valid());
//! assert_eq!(v.field_errors["title"], vec!["This field cannot be empty"]);
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// User names: 3-30 characters of ASCII letters, digits, `_`, `.` or `-`,
/// starting with a letter or digit.
pub static USERNAME_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.\-]{2,29}$").expect("username pattern compiles")
});

/// Email addresses, as accepted by the WHATWG `input type=email` algorithm.
pub static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~\-]+@[a-zA-Z0-9](?:[a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

/// Accumulated validation errors for one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    /// Field name -> messages, in the order they were added
    pub field_errors: BTreeMap<String, Vec<String>>,
    /// Failures not attributable to one input, e.g. bad credentials
    pub non_field_errors: Vec<String>,
}

impl Validator {
    /// True iff no errors of either kind were recorded
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Record `message` against `field` unless `ok`
    pub fn check_field(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_field_error(field, message);
        }
    }

    pub fn add_field_error(&mut self, field: &str, message: &str) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_string());
    }

    /// First message recorded for `field`
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Non-empty after trimming whitespace
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// At most `n` characters (Unicode scalar values, not bytes)
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

/// At least `n` characters (Unicode scalar values, not bytes)
pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

/// Whole-string match. Callers pass anchored patterns such as [`USERNAME_RX`].
pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

/// Byte-wise equality
pub fn equal_to(value: &str, other: &str) -> bool {
    value == other
}
