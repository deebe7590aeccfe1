//! Common ID Types
//!
//! Type-safe wrappers around the integer keys the store assigns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type PostId = Id<markers::Post>;
///
/// let id: PostId = "42".parse().unwrap();
/// assert_eq!(id.get(), 42);
/// ```
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    value: i64,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

/// A path segment that is not a positive integer id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid id: {0:?}")]
pub struct ParseIdError(String);

impl<T> Id<T> {
    /// Wrap a key read from the store
    pub const fn new(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Raw key for binding into queries
    pub const fn get(&self) -> i64 {
        self.value
    }
}

impl<T> FromStr for Id<T> {
    type Err = ParseIdError;

    /// Only positive integers are ids; `0`, negatives and junk are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(value) if value >= 1 => Ok(Self::new(value)),
            _ => Err(ParseIdError(s.to_string())),
        }
    }
}

// Manual impls: derives would require `T: Clone` etc. on the marker.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for blog post IDs
    pub struct Post;

    /// Marker for user IDs
    pub struct User;
}

/// Type aliases for common IDs
pub type PostId = Id<markers::Post>;
pub type UserId = Id<markers::User>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_ids() {
        let id: PostId = "7".parse().unwrap();
        assert_eq!(id.get(), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_parse_rejects_non_positive_and_junk() {
        assert!("0".parse::<PostId>().is_err());
        assert!("-3".parse::<PostId>().is_err());
        assert!("abc".parse::<PostId>().is_err());
        assert!("".parse::<PostId>().is_err());
        assert!("1.5".parse::<PostId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = UserId::new(12);
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
        let back: UserId = serde_json::from_str("12").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_ordering_follows_value() {
        assert!(PostId::new(3) > PostId::new(2));
    }
}
