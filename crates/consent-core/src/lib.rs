//! # consent-core — Foundational Types for Consent Forms
//!
//! Leaf crate of the consent workspace. It defines the validated
//! primitives every other crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated term keys.** `TermKey` rejects empty and whitespace-bearing
//!    names at construction. The two action pseudo-keys (`allAgreements`,
//!    `reset`) are recognizable via `TermKey::is_reserved()`.
//!
//! 2. **Per-instance identity.** Every consent form carries its own `FormId`.
//!    There is no process-wide form state.
//!
//! 3. **Declarative configuration.** Forms are declared as an ordered list of
//!    `TermDefinition`s (YAML, JSON, or built in code), not discovered from
//!    mount order.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use config::{ConsentFormConfig, TermDefinition, UnknownTermPolicy};
pub use error::{ConfigError, ConsentError};
pub use identity::{FormId, TermKey, ALL_AGREEMENTS, RESET};
pub use temporal::Timestamp;
