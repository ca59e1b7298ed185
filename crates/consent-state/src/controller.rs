//! # Consent Controller
//!
//! Facade over one consent form: registry, agreement state, and required
//! field tracker behind a single API.
//!
//! ## Control Flow
//!
//! ```text
//! toggle(key, checked)
//!   └─▶ AgreementAction::from_event
//!         └─▶ unknown-term policy (auto-register or reject)
//!               └─▶ next state = reduce(state, action)
//!                   next tracker = tracker.transition(action)
//!                     └─▶ commit both, append transition record
//! ```
//!
//! All checks run before anything is committed, so a rejected toggle leaves
//! the form untouched. Actions are applied strictly in call order.
//!
//! Each controller owns its state. Two forms never share a tracker.

use consent_core::{
    ConsentError, ConsentFormConfig, FormId, TermKey, Timestamp, UnknownTermPolicy,
};
use serde::{Deserialize, Serialize};

use crate::registry::{RegistrationOutcome, TermRegistry};
use crate::snapshot::{ConsentSnapshot, TermView};
use crate::store::{AgreementAction, AgreementState};
use crate::tracker::{Requirement, RequiredFieldTracker};

/// Record of one committed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentTransitionRecord {
    /// The action applied.
    pub action: AgreementAction,
    /// Form validity before the action.
    pub was_valid: bool,
    /// Form validity after the action.
    pub is_valid: bool,
    /// When the action was committed.
    pub timestamp: Timestamp,
}

/// A consent form instance.
#[derive(Debug)]
pub struct ConsentController {
    form_id: FormId,
    unknown_terms: UnknownTermPolicy,
    registry: TermRegistry,
    state: AgreementState,
    tracker: RequiredFieldTracker,
    transitions: Vec<ConsentTransitionRecord>,
}

impl ConsentController {
    /// Build a form from its declaration, registering every term in order.
    ///
    /// # Errors
    ///
    /// `ConsentError::Config` for duplicate keys and
    /// `ConsentError::ReservedKey` if a pseudo-key is declared as a term.
    pub fn new(config: ConsentFormConfig) -> Result<Self, ConsentError> {
        config.validate()?;
        let mut controller = Self {
            form_id: FormId::new(),
            unknown_terms: config.unknown_terms,
            registry: TermRegistry::new(),
            state: AgreementState::new(),
            tracker: RequiredFieldTracker::new(),
            transitions: Vec::new(),
        };
        for term in config.terms {
            controller.register_term(term.key, term.required)?;
        }
        tracing::debug!(
            form_id = %controller.form_id,
            terms = controller.registry.len(),
            required = controller.tracker.cached().len(),
            "consent form created"
        );
        Ok(controller)
    }

    /// The standard five-term signup form.
    pub fn standard_signup() -> Result<Self, ConsentError> {
        Self::new(ConsentFormConfig::standard_signup())
    }

    /// Register a term. Idempotent; see [`TermRegistry::register`].
    ///
    /// A required key registered after it was toggled is classified against
    /// its current checked value.
    pub fn register(
        &mut self,
        key: &str,
        required: bool,
    ) -> Result<RegistrationOutcome, ConsentError> {
        self.register_term(TermKey::new(key)?, required)
    }

    fn register_term(
        &mut self,
        key: TermKey,
        required: bool,
    ) -> Result<RegistrationOutcome, ConsentError> {
        let outcome = match self.registry.register(key.clone(), required) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(form_id = %self.form_id, key = %key, "refused to register reserved key");
                return Err(e);
            }
        };
        if !outcome.is_change() {
            return Ok(outcome);
        }

        let state = self.state.with_term(&key);
        let tracker = if self.registry.is_required(key.as_str()) {
            let checked = state.checked(key.as_str()).unwrap_or(false);
            self.tracker.with_registration(&key, checked)
        } else {
            self.tracker.clone()
        };
        self.state = state;
        self.tracker = tracker;

        tracing::debug!(
            form_id = %self.form_id,
            key = %key,
            required = self.registry.is_required(key.as_str()),
            ?outcome,
            "term registered"
        );
        Ok(outcome)
    }

    /// Apply a checkbox change. `key` may be a term, `allAgreements`, or
    /// `reset`.
    pub fn toggle(&mut self, key: &str, checked: bool) -> Result<(), ConsentError> {
        self.apply_event(key, Some(checked))
    }

    /// Apply a raw presentation event.
    pub fn apply_event(&mut self, name: &str, payload: Option<bool>) -> Result<(), ConsentError> {
        let action = AgreementAction::from_event(name, payload)?;
        self.dispatch(action)
    }

    /// Apply a typed action.
    ///
    /// # Errors
    ///
    /// `ConsentError::ReservedKey` for a `Set` on a pseudo-key, and
    /// `ConsentError::UnknownTerm` for a `Set` on an unregistered key when the
    /// form rejects unknown terms.
    pub fn dispatch(&mut self, action: AgreementAction) -> Result<(), ConsentError> {
        if let AgreementAction::Set { key, .. } = &action {
            if key.is_reserved() {
                return Err(ConsentError::ReservedKey {
                    key: key.to_string(),
                });
            }
            if !self.registry.is_known(key.as_str()) {
                match self.unknown_terms {
                    UnknownTermPolicy::Reject => {
                        tracing::warn!(form_id = %self.form_id, key = %key, "toggle of unknown term rejected");
                        return Err(ConsentError::UnknownTerm {
                            key: key.to_string(),
                        });
                    }
                    UnknownTermPolicy::AutoRegister => {
                        tracing::warn!(form_id = %self.form_id, key = %key, "auto-registering unknown term as optional");
                        self.register_term(key.clone(), false)?;
                    }
                }
            }
        }
        self.commit(action);
        Ok(())
    }

    /// Uncheck every term and make every required term pending again.
    pub fn reset(&mut self) {
        self.commit(AgreementAction::Reset);
    }

    fn commit(&mut self, action: AgreementAction) {
        let was_valid = self.tracker.is_valid();
        let state = self.state.apply(&action);
        let tracker = self.tracker.transition(&action);
        self.state = state;
        self.tracker = tracker;

        let is_valid = self.tracker.is_valid();
        tracing::debug!(
            form_id = %self.form_id,
            action = %action,
            pending = self.tracker.pending().len(),
            valid = is_valid,
            "consent transition committed"
        );
        self.transitions.push(ConsentTransitionRecord {
            action,
            was_valid,
            is_valid,
            timestamp: Timestamp::now(),
        });
    }

    /// Checked value of `key`; `false` for unknown keys.
    pub fn get_checked(&self, key: &str) -> bool {
        self.state.checked(key).unwrap_or(false)
    }

    /// Whether every registered term is checked.
    pub fn is_all_checked(&self) -> bool {
        self.state.is_all_checked()
    }

    /// Whether no required term is pending.
    pub fn is_valid(&self) -> bool {
        self.tracker.is_valid()
    }

    /// Required terms still owing consent, in key order.
    pub fn pending_required(&self) -> impl Iterator<Item = &TermKey> {
        self.tracker.pending().iter()
    }

    /// Status of a required term, `None` for optional or unknown keys.
    pub fn requirement(&self, key: &str) -> Option<Requirement> {
        self.tracker.requirement(key)
    }

    /// Render-ready view of the form.
    pub fn snapshot(&self) -> ConsentSnapshot {
        let terms = self
            .registry
            .keys()
            .map(|key| TermView {
                key: key.clone(),
                checked: self.get_checked(key.as_str()),
                required: self.registry.is_required(key.as_str()),
            })
            .collect();
        ConsentSnapshot {
            form_id: self.form_id,
            terms,
            all_checked: self.is_all_checked(),
            valid: self.is_valid(),
            pending: self.tracker.pending().iter().cloned().collect(),
        }
    }

    /// This form's identifier.
    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    /// The term registry.
    pub fn registry(&self) -> &TermRegistry {
        &self.registry
    }

    /// The current agreement state.
    pub fn state(&self) -> &AgreementState {
        &self.state
    }

    /// The required field tracker.
    pub fn tracker(&self) -> &RequiredFieldTracker {
        &self.tracker
    }

    /// Every committed action, oldest first.
    pub fn transitions(&self) -> &[ConsentTransitionRecord] {
        &self.transitions
    }
}
