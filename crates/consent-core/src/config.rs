//! # Form Configuration
//!
//! A consent form is declared up front as an ordered list of term
//! definitions plus a strictness policy for toggles of unknown terms.
//! Configurations load from YAML or JSON:
//!
//! ```yaml
//! unknown_terms: reject
//! terms:
//!   - key: isMoreThan14
//!     required: true
//!   - key: marketing
//! ```
//!
//! `required` defaults to `false`; `unknown_terms` defaults to
//! `auto_register`. A term key may appear only once per configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::identity::TermKey;

/// One consent item in a form declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDefinition {
    /// The term key.
    pub key: TermKey,
    /// Whether the term must be checked for the form to be valid.
    #[serde(default)]
    pub required: bool,
}

impl TermDefinition {
    /// A term that must be checked.
    pub fn required(key: TermKey) -> Self {
        Self {
            key,
            required: true,
        }
    }

    /// A term that may be left unchecked.
    pub fn optional(key: TermKey) -> Self {
        Self {
            key,
            required: false,
        }
    }
}

/// How a form treats a toggle for a key it never registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTermPolicy {
    /// Register the key as an optional term and apply the toggle.
    #[default]
    AutoRegister,
    /// Refuse the toggle with `ConsentError::UnknownTerm`.
    Reject,
}

/// Declarative description of a consent form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentFormConfig {
    /// Terms in display order.
    #[serde(default)]
    pub terms: Vec<TermDefinition>,
    /// Strictness for toggles of unregistered keys.
    #[serde(default)]
    pub unknown_terms: UnknownTermPolicy,
}

impl ConsentFormConfig {
    /// The five-term signup form: age, terms of service, and privacy are
    /// required; third-party sharing and marketing are optional.
    pub fn standard_signup() -> Self {
        Self {
            terms: vec![
                TermDefinition::required(TermKey::from_static("isMoreThan14")),
                TermDefinition::required(TermKey::from_static("termOfService")),
                TermDefinition::required(TermKey::from_static("privacy")),
                TermDefinition::optional(TermKey::from_static("privacyThirdParty")),
                TermDefinition::optional(TermKey::from_static("marketing")),
            ],
            unknown_terms: UnknownTermPolicy::default(),
        }
    }

    /// Append a term definition.
    pub fn with_term(mut self, key: TermKey, required: bool) -> Self {
        self.terms.push(TermDefinition { key, required });
        self
    }

    /// Set the unknown-term policy.
    pub fn with_unknown_terms(mut self, policy: UnknownTermPolicy) -> Self {
        self.unknown_terms = policy;
        self
    }

    /// Parse and validate a YAML configuration.
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that list the same key twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for term in &self.terms {
            if !seen.insert(&term.key) {
                return Err(ConfigError::DuplicateTerm {
                    key: term.key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Keys of the terms declared as required, in declaration order.
    pub fn required_keys(&self) -> impl Iterator<Item = &TermKey> {
        self.terms.iter().filter(|t| t.required).map(|t| &t.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> TermKey {
        TermKey::new(s).unwrap()
    }

    #[test]
    fn test_standard_signup_layout() {
        let config = ConsentFormConfig::standard_signup();
        let keys: Vec<&str> = config.terms.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(
            keys,
            ["isMoreThan14", "termOfService", "privacy", "privacyThirdParty", "marketing"]
        );
        let required: Vec<&str> = config.required_keys().map(TermKey::as_str).collect();
        assert_eq!(required, ["isMoreThan14", "termOfService", "privacy"]);
        assert_eq!(config.unknown_terms, UnknownTermPolicy::AutoRegister);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_with_defaults() {
        let yaml = r#"
terms:
  - key: isMoreThan14
    required: true
  - key: marketing
"#;
        let config = ConsentFormConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.terms.len(), 2);
        assert!(config.terms[0].required);
        assert!(!config.terms[1].required);
        assert_eq!(config.unknown_terms, UnknownTermPolicy::AutoRegister);
    }

    #[test]
    fn test_from_yaml_reject_policy() {
        let yaml = "unknown_terms: reject\nterms: []\n";
        let config = ConsentFormConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.unknown_terms, UnknownTermPolicy::Reject);
        assert!(config.terms.is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"terms":[{"key":"privacy","required":true}],"unknown_terms":"auto_register"}"#;
        let config = ConsentFormConfig::from_json(json).unwrap();
        assert_eq!(config.terms, vec![TermDefinition::required(key("privacy"))]);
    }

    #[test]
    fn test_duplicate_term_rejected() {
        let yaml = r#"
terms:
  - key: privacy
    required: true
  - key: privacy
"#;
        let err = ConsentFormConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTerm { ref key } if key == "privacy"));
    }

    #[test]
    fn test_invalid_key_in_yaml_rejected() {
        let yaml = "terms:\n  - key: \"\"\n";
        assert!(matches!(
            ConsentFormConfig::from_yaml(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            ConsentFormConfig::from_json("{\"terms\": 3}"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = ConsentFormConfig::default()
            .with_term(key("a"), true)
            .with_term(key("b"), false)
            .with_unknown_terms(UnknownTermPolicy::Reject);
        assert_eq!(config.terms.len(), 2);
        assert_eq!(config.required_keys().count(), 1);
        assert_eq!(config.unknown_terms, UnknownTermPolicy::Reject);
    }
}
