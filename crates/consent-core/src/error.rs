//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the consent stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Registry and toggle errors carry the offending term key.
//! - Configuration errors wrap the underlying parser error.
//! - Duplicate registration is not an error: `register` is idempotent.

use thiserror::Error;

/// Top-level error type for consent form operations.
#[derive(Error, Debug)]
pub enum ConsentError {
    /// A toggle referenced a term key that was never registered and the
    /// form is configured to reject unknown terms.
    #[error("unknown term: {key}")]
    UnknownTerm {
        /// The key that was toggled.
        key: String,
    },

    /// A pseudo-key (`allAgreements`, `reset`) was registered as a term.
    #[error("{key:?} is a reserved action key and cannot be registered as a term")]
    ReservedKey {
        /// The reserved key.
        key: String,
    },

    /// Term key text failed validation.
    #[error("invalid term key: {0}")]
    InvalidTermKey(String),

    /// A raw event could not be turned into an action.
    ///
    /// This indicates miswired presentation code, not a user error.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Form configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Error loading a consent form configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// YAML parsing failed.
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing failed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// The same term key appears more than once in a configuration.
    #[error("term {key:?} is defined more than once")]
    DuplicateTerm {
        /// The repeated key.
        key: String,
    },
}
