//! # Required Field Tracker
//!
//! Tracks which required terms still owe consent. Two sets are kept:
//!
//! - **cached**: every key ever registered as required. Only grows.
//! - **pending**: required keys that are currently unchecked.
//!
//! The form is valid iff `pending` is empty.
//!
//! ## Transitions
//!
//! ```text
//! Set { k, true }        k ∈ cached  ──▶ remove k from pending   (Pending → Satisfied)
//! Set { k, false }       k ∈ cached  ──▶ insert k into pending   (Satisfied → Pending)
//! SetAll { true }                    ──▶ pending = ∅
//! SetAll { false }                   ──▶ pending = cached
//! Reset                              ──▶ pending = cached
//! ```
//!
//! Deselect-all restores the full cached set, whatever each key's history
//! was before select-all. Toggles of keys outside `cached` leave the tracker
//! untouched, so a required key toggled before its registration is only
//! classified when it is registered, against its checked value at that time.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use consent_core::TermKey;

use crate::store::{AgreementAction, AgreementState};

/// Consent status of one required term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    /// Required and unchecked.
    Pending,
    /// Required and checked.
    Satisfied,
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Satisfied => "SATISFIED",
        };
        f.write_str(s)
    }
}

/// Live and cached required-term sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredFieldTracker {
    cached: BTreeSet<TermKey>,
    pending: BTreeSet<TermKey>,
}

impl RequiredFieldTracker {
    /// A tracker with no required terms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` as required, classifying it against its current checked
    /// value. Pseudo-keys are ignored.
    pub fn with_registration(&self, key: &TermKey, checked: bool) -> Self {
        if key.is_reserved() {
            return self.clone();
        }
        let mut next = self.clone();
        next.cached.insert(key.clone());
        if checked {
            next.pending.remove(key);
        } else {
            next.pending.insert(key.clone());
        }
        next
    }

    /// Transition for a single-term toggle.
    pub fn on_toggle(&self, key: &TermKey, checked: bool) -> Self {
        if !self.cached.contains(key) {
            return self.clone();
        }
        let mut next = self.clone();
        if checked {
            next.pending.remove(key);
        } else {
            next.pending.insert(key.clone());
        }
        next
    }

    /// Transition for the select/deselect-all broadcast.
    pub fn on_broadcast(&self, checked: bool) -> Self {
        if checked {
            Self {
                cached: self.cached.clone(),
                pending: BTreeSet::new(),
            }
        } else {
            self.restored()
        }
    }

    /// Every cached key pending again.
    pub fn restored(&self) -> Self {
        Self {
            cached: self.cached.clone(),
            pending: self.cached.clone(),
        }
    }

    /// Transition matching an agreement action.
    pub fn transition(&self, action: &AgreementAction) -> Self {
        match action {
            AgreementAction::Set { key, checked } => self.on_toggle(key, *checked),
            AgreementAction::SetAll { checked } => self.on_broadcast(*checked),
            AgreementAction::Reset => self.restored(),
        }
    }

    /// Whether no required term is pending.
    pub fn is_valid(&self) -> bool {
        self.pending.is_empty()
    }

    /// Required terms still owing consent.
    pub fn pending(&self) -> &BTreeSet<TermKey> {
        &self.pending
    }

    /// Every key ever registered as required.
    pub fn cached(&self) -> &BTreeSet<TermKey> {
        &self.cached
    }

    /// Status of `key`, or `None` if it is not required.
    pub fn requirement(&self, key: &str) -> Option<Requirement> {
        if !self.cached.contains(key) {
            None
        } else if self.pending.contains(key) {
            Some(Requirement::Pending)
        } else {
            Some(Requirement::Satisfied)
        }
    }

    /// Whether `pending` is exactly the cached keys that are unchecked in
    /// `state`. Cached keys missing from `state` count as unchecked.
    pub fn is_consistent_with(&self, state: &AgreementState) -> bool {
        let expected: BTreeSet<&TermKey> = self
            .cached
            .iter()
            .filter(|k| !state.checked(k.as_str()).unwrap_or(false))
            .collect();
        self.pending.iter().collect::<BTreeSet<_>>() == expected
    }
}
