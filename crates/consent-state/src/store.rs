//! # Agreement Store
//!
//! Per-term checked state and the pure reducer that advances it.
//!
//! ## Actions
//!
//! ```text
//! Set { key, checked }   one term           state[key] = checked
//! SetAll { checked }     select/deselect    every term = checked, one transition
//! Reset                  clear              every term = false
//! ```
//!
//! The reducer never mutates its input. It returns a new `AgreementState`,
//! so a caller can compute the next state, check it, and commit it in one
//! step. Keys are never removed once present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use consent_core::{ConsentError, TermKey, ALL_AGREEMENTS, RESET};

// ─── Actions ─────────────────────────────────────────────────────────

/// A state transition request for the agreement store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgreementAction {
    /// Set a single term.
    Set {
        /// The term to set.
        key: TermKey,
        /// The new checked value.
        checked: bool,
    },
    /// Set every known term to the same value.
    SetAll {
        /// The value broadcast to every term.
        checked: bool,
    },
    /// Uncheck every known term.
    Reset,
}

impl AgreementAction {
    /// Build an action from a raw presentation event: an input name and its
    /// checked value.
    ///
    /// `"reset"` ignores the payload. `"allAgreements"` and term names need one.
    ///
    /// # Errors
    ///
    /// `ConsentError::InvalidAction` when a required payload is missing, and
    /// `ConsentError::InvalidTermKey` when `name` is not a valid key.
    pub fn from_event(name: &str, payload: Option<bool>) -> Result<Self, ConsentError> {
        match name {
            RESET => Ok(Self::Reset),
            ALL_AGREEMENTS => payload
                .map(|checked| Self::SetAll { checked })
                .ok_or_else(|| {
                    ConsentError::InvalidAction(format!("{ALL_AGREEMENTS} requires a payload"))
                }),
            _ => {
                let key = TermKey::new(name)?;
                let checked = payload.ok_or_else(|| {
                    ConsentError::InvalidAction(format!("toggle of {key} requires a payload"))
                })?;
                Ok(Self::Set { key, checked })
            }
        }
    }
}

impl std::fmt::Display for AgreementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set { key, checked } => write!(f, "{key}={checked}"),
            Self::SetAll { checked } => write!(f, "{ALL_AGREEMENTS}={checked}"),
            Self::Reset => f.write_str(RESET),
        }
    }
}

// ─── State ───────────────────────────────────────────────────────────

/// Checked value per term key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementState {
    terms: BTreeMap<TermKey, bool>,
}

impl AgreementState {
    /// A state with no terms.
    pub fn new() -> Self {
        Self::default()
    }

    /// A state with every given key unchecked.
    pub fn from_keys<I: IntoIterator<Item = TermKey>>(keys: I) -> Self {
        Self {
            terms: keys.into_iter().map(|k| (k, false)).collect(),
        }
    }

    /// This state with `key` present. A new key starts unchecked; an existing
    /// key keeps its value.
    pub fn with_term(&self, key: &TermKey) -> Self {
        let mut next = self.clone();
        next.terms.entry(key.clone()).or_insert(false);
        next
    }

    /// Apply `action`, returning the next state.
    pub fn apply(&self, action: &AgreementAction) -> Self {
        reduce(self, action)
    }

    /// Checked value of `key`, or `None` if the key is unknown.
    pub fn checked(&self, key: &str) -> Option<bool> {
        self.terms.get(key).copied()
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.terms.contains_key(key)
    }

    /// Whether every known term is checked. True for a state with no terms.
    pub fn is_all_checked(&self) -> bool {
        self.terms.values().all(|&checked| checked)
    }

    /// Terms and their values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&TermKey, bool)> {
        self.terms.iter().map(|(k, &v)| (k, v))
    }

    /// Number of known terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether no term is known.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// The agreement reducer.
///
/// `Set` on a key the state has never seen adds it; whether that is allowed
/// is decided by the caller before reducing.
pub fn reduce(state: &AgreementState, action: &AgreementAction) -> AgreementState {
    let mut next = state.clone();
    match action {
        AgreementAction::Set { key, checked } => {
            next.terms.insert(key.clone(), *checked);
        }
        AgreementAction::SetAll { checked } => {
            next.terms.values_mut().for_each(|v| *v = *checked);
        }
        AgreementAction::Reset => {
            next.terms.values_mut().for_each(|v| *v = false);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> TermKey {
        TermKey::new(s).unwrap()
    }

    fn signup_state() -> AgreementState {
        AgreementState::from_keys(
            ["isMoreThan14", "termOfService", "privacy", "privacyThirdParty", "marketing"]
                .into_iter()
                .map(key),
        )
    }

    fn set(k: &str, checked: bool) -> AgreementAction {
        AgreementAction::Set {
            key: key(k),
            checked,
        }
    }

    // ── Reducer ──────────────────────────────────────────────────────

    #[test]
    fn test_set_changes_only_target() {
        let state = signup_state();
        let next = state
            .apply(&set("privacy", true))
            .apply(&set("privacyThirdParty", true));
        assert_eq!(next.checked("privacy"), Some(true));
        assert_eq!(next.checked("privacyThirdParty"), Some(true));
        assert_eq!(next.checked("isMoreThan14"), Some(false));
        assert_eq!(next.checked("termOfService"), Some(false));
        assert_eq!(next.checked("marketing"), Some(false));
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let state = signup_state();
        let _ = state.apply(&AgreementAction::SetAll { checked: true });
        assert!(state.iter().all(|(_, checked)| !checked));
    }

    #[test]
    fn test_set_all_true() {
        let next = signup_state().apply(&AgreementAction::SetAll { checked: true });
        assert!(next.is_all_checked());
        assert_eq!(next.len(), 5);
    }

    #[test]
    fn test_set_all_false_after_partial() {
        let next = signup_state()
            .apply(&set("privacy", true))
            .apply(&AgreementAction::SetAll { checked: false });
        assert!(next.iter().all(|(_, checked)| !checked));
    }

    #[test]
    fn test_reset_unchecks_everything() {
        let next = signup_state()
            .apply(&AgreementAction::SetAll { checked: true })
            .apply(&AgreementAction::Reset);
        assert!(next.iter().all(|(_, checked)| !checked));
        assert_eq!(next.len(), 5);
    }

    #[test]
    fn test_set_unknown_key_creates_it() {
        let next = signup_state().apply(&set("newsletter", true));
        assert_eq!(next.checked("newsletter"), Some(true));
        assert_eq!(next.len(), 6);
    }

    #[test]
    fn test_with_term_keeps_existing_value() {
        let state = signup_state().apply(&set("privacy", true));
        let next = state.with_term(&key("privacy"));
        assert_eq!(next.checked("privacy"), Some(true));
        let next = next.with_term(&key("newsletter"));
        assert_eq!(next.checked("newsletter"), Some(false));
    }

    // ── Derived queries ──────────────────────────────────────────────

    #[test]
    fn test_is_all_checked_requires_every_term() {
        let mut state = signup_state();
        for k in ["isMoreThan14", "termOfService", "privacy", "privacyThirdParty"] {
            state = state.apply(&set(k, true));
            assert!(!state.is_all_checked());
        }
        state = state.apply(&set("marketing", true));
        assert!(state.is_all_checked());
    }

    #[test]
    fn test_empty_state_is_all_checked() {
        assert!(AgreementState::new().is_all_checked());
    }

    #[test]
    fn test_unknown_key_query() {
        assert_eq!(signup_state().checked("nope"), None);
        assert!(!signup_state().contains("nope"));
    }

    // ── Raw events ───────────────────────────────────────────────────

    #[test]
    fn test_from_event_term() {
        let action = AgreementAction::from_event("privacy", Some(true)).unwrap();
        assert_eq!(action, set("privacy", true));
    }

    #[test]
    fn test_from_event_all_agreements() {
        let action = AgreementAction::from_event("allAgreements", Some(false)).unwrap();
        assert_eq!(action, AgreementAction::SetAll { checked: false });
    }

    #[test]
    fn test_from_event_reset_ignores_payload() {
        assert_eq!(
            AgreementAction::from_event("reset", None).unwrap(),
            AgreementAction::Reset
        );
        assert_eq!(
            AgreementAction::from_event("reset", Some(true)).unwrap(),
            AgreementAction::Reset
        );
    }

    #[test]
    fn test_from_event_missing_payload() {
        assert!(matches!(
            AgreementAction::from_event("privacy", None),
            Err(ConsentError::InvalidAction(_))
        ));
        assert!(matches!(
            AgreementAction::from_event("allAgreements", None),
            Err(ConsentError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_from_event_invalid_name() {
        assert!(matches!(
            AgreementAction::from_event("", Some(true)),
            Err(ConsentError::InvalidTermKey(_))
        ));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(set("privacy", true).to_string(), "privacy=true");
        assert_eq!(
            AgreementAction::SetAll { checked: false }.to_string(),
            "allAgreements=false"
        );
        assert_eq!(AgreementAction::Reset.to_string(), "reset");
    }

    #[test]
    fn test_action_serialization_is_tagged() {
        let json = serde_json::to_value(set("privacy", true)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "set", "key": "privacy", "checked": true})
        );
        let reset = serde_json::to_value(AgreementAction::Reset).unwrap();
        assert_eq!(reset, serde_json::json!({"type": "reset"}));
    }
}
