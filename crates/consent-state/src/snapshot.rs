//! # Consent Snapshot
//!
//! Immutable, render-ready view of a consent form: every term's checked and
//! required flags in registration order, plus the aggregate flags.

use serde::{Deserialize, Serialize};

use consent_core::{FormId, TermKey};

/// One term as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermView {
    /// The term key.
    pub key: TermKey,
    /// Whether the term is checked.
    pub checked: bool,
    /// Whether the term is required.
    pub required: bool,
}

/// Point-in-time view of a consent form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentSnapshot {
    /// The form this snapshot was taken from.
    pub form_id: FormId,
    /// Terms in registration order.
    pub terms: Vec<TermView>,
    /// Whether every term is checked (drives the select-all checkbox).
    pub all_checked: bool,
    /// Whether no required term is pending (gates submission).
    pub valid: bool,
    /// Required terms still owing consent, in key order.
    pub pending: Vec<TermKey>,
}

impl ConsentSnapshot {
    /// Checked value of `key`, `false` if absent.
    pub fn is_checked(&self, key: &str) -> bool {
        self.terms
            .iter()
            .find(|t| t.key.as_str() == key)
            .is_some_and(|t| t.checked)
    }

    /// Whether every required term in `terms` is checked.
    ///
    /// Agrees with `valid` for any snapshot taken from a controller.
    pub fn required_satisfied(&self) -> bool {
        self.terms.iter().filter(|t| t.required).all(|t| t.checked)
    }
}
