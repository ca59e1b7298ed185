//! # consent-state — Consent Aggregation State Machine
//!
//! Stores per-term checked state for a consent form, tracks which required
//! terms still owe consent, and exposes a single validity signal.
//!
//! ## Components
//!
//! - **Registry** (`registry.rs`): known term keys in registration order and
//!   their required classification. Idempotent registration.
//!
//! - **Store** (`store.rs`): `AgreementState` and the pure reducer over
//!   `AgreementAction` (`Set`, `SetAll`, `Reset`).
//!
//! - **Tracker** (`tracker.rs`): `RequiredFieldTracker`, the cached and live
//!   required sets and their Pending/Satisfied transitions, including the
//!   select-all / deselect-all reconciliation.
//!
//! - **Controller** (`controller.rs`): `ConsentController`, the facade that
//!   applies a toggle to store and tracker in one committed step.
//!
//! - **Snapshot** (`snapshot.rs`): immutable render-ready view.
//!
//! ## Example
//!
//! ```
//! use consent_state::ConsentController;
//!
//! let mut form = ConsentController::standard_signup()?;
//! form.toggle("privacy", true)?;
//! assert!(!form.is_valid());
//!
//! form.toggle("allAgreements", true)?;
//! assert!(form.is_valid() && form.is_all_checked());
//!
//! form.toggle("allAgreements", false)?;
//! assert_eq!(form.pending_required().count(), 3);
//! # Ok::<(), consent_core::ConsentError>(())
//! ```

pub mod controller;
pub mod registry;
pub mod snapshot;
pub mod store;
pub mod tracker;

pub use controller::{ConsentController, ConsentTransitionRecord};
pub use registry::{RegistrationOutcome, TermRegistry};
pub use snapshot::{ConsentSnapshot, TermView};
pub use store::{reduce, AgreementAction, AgreementState};
pub use tracker::{Requirement, RequiredFieldTracker};
