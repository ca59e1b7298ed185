//! # Identity Newtypes
//!
//! `TermKey` names one consent item; `FormId` names one consent form
//! instance. Term keys are validated at construction so that every key
//! flowing through the registry, reducer, and tracker is well-formed.
//!
//! ## Reserved Keys
//!
//! Two names are action keys rather than terms: [`ALL_AGREEMENTS`] (the
//! select-all broadcast) and [`RESET`]. They can be parsed as `TermKey`s so
//! that raw events can carry them, but the registry refuses to register them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConsentError;

/// Pseudo-key for the select/deselect-all broadcast.
pub const ALL_AGREEMENTS: &str = "allAgreements";

/// Pseudo-key for the reset action.
pub const RESET: &str = "reset";

/// Identifier of a single consent item (e.g. `"privacy"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TermKey(String);

impl TermKey {
    /// Create a term key, rejecting empty strings and embedded whitespace.
    pub fn new(key: impl Into<String>) -> Result<Self, ConsentError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConsentError::InvalidTermKey(
                "term key must not be empty".to_string(),
            ));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(ConsentError::InvalidTermKey(format!(
                "term key must not contain whitespace, got: {key:?}"
            )));
        }
        Ok(Self(key))
    }

    /// Wrap a compile-time literal known to be a valid key.
    pub(crate) fn from_static(key: &'static str) -> Self {
        debug_assert!(!key.is_empty() && !key.chars().any(char::is_whitespace));
        Self(key.to_string())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key is one of the action pseudo-keys.
    pub fn is_reserved(&self) -> bool {
        matches!(self.0.as_str(), ALL_AGREEMENTS | RESET)
    }
}

impl TryFrom<String> for TermKey {
    type Error = ConsentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TermKey {
    type Error = ConsentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TermKey> for String {
    fn from(key: TermKey) -> Self {
        key.0
    }
}

impl std::borrow::Borrow<str> for TermKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TermKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for one consent form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormId(pub Uuid);

impl FormId {
    /// Generate a new random form identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "form:{}", self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any non-empty whitespace-free string is a valid key and keeps its text.
        #[test]
        fn term_key_accepts_whitespace_free(s in "[A-Za-z0-9_.-]{1,32}") {
            let key = TermKey::new(s.clone()).unwrap();
            prop_assert_eq!(key.as_str(), s.as_str());
        }

        /// Any string with embedded whitespace is rejected.
        #[test]
        fn term_key_rejects_whitespace(a in "[a-z]{0,8}", b in "[a-z]{0,8}", ws in "[ \t\n]") {
            let s = format!("{a}{ws}{b}");
            prop_assert!(TermKey::new(s).is_err());
        }
    }
}
