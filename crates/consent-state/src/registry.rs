//! # Term Registry
//!
//! The set of term keys a form knows about, in first-registration order,
//! and which of them are required.
//!
//! Registration is idempotent. Registering a known key again never adds a
//! second entry. A known optional key registered again as required is
//! upgraded; a required key is never downgraded. Pseudo-keys are refused.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use consent_core::{ConsentError, TermKey};

/// What a `register` call changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The key was not known before.
    New,
    /// The key was known as optional and is now required.
    UpgradedToRequired,
    /// Nothing changed.
    Unchanged,
}

impl RegistrationOutcome {
    /// Whether the registration changed the registry.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Known term keys and their required classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRegistry {
    order: Vec<TermKey>,
    required: BTreeSet<TermKey>,
}

impl TermRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key`, marking it required if `required` is set.
    ///
    /// # Errors
    ///
    /// Returns `ConsentError::ReservedKey` for `allAgreements` and `reset`.
    pub fn register(
        &mut self,
        key: TermKey,
        required: bool,
    ) -> Result<RegistrationOutcome, ConsentError> {
        if key.is_reserved() {
            return Err(ConsentError::ReservedKey {
                key: key.to_string(),
            });
        }

        if !self.is_known(key.as_str()) {
            if required {
                self.required.insert(key.clone());
            }
            self.order.push(key);
            return Ok(RegistrationOutcome::New);
        }

        if required && self.required.insert(key) {
            return Ok(RegistrationOutcome::UpgradedToRequired);
        }
        Ok(RegistrationOutcome::Unchanged)
    }

    /// Whether `key` has been registered.
    pub fn is_known(&self, key: &str) -> bool {
        self.order.iter().any(|k| k.as_str() == key)
    }

    /// Whether `key` has been registered as required.
    pub fn is_required(&self, key: &str) -> bool {
        self.required.contains(key)
    }

    /// Registered keys in first-registration order.
    pub fn keys(&self) -> impl Iterator<Item = &TermKey> {
        self.order.iter()
    }

    /// Keys ever registered as required.
    pub fn required_keys(&self) -> &BTreeSet<TermKey> {
        &self.required
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no key has been registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
