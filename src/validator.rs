//! Configuration validation
//!
//! [`ConfigValidator`] evaluates one config against its family's constraint
//! set. Malformed but well-typed input (empty strings, empty collections)
//! comes back as validation failures, never as an error - only programmer
//! errors (a mis-shaped constraint, a lookup miss for a registered family)
//! abort the call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigField, IndexerConfig};
use crate::constraint::FieldConstraintSet;
use crate::error::HuntsmanError;
use crate::profile::{CapabilityProfile, lookup_capability_profile};

/// One or more "&key=value" groups, e.g. "&extended=1&maxage=365".
static ADDITIONAL_PARAMETERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(&.+?=.+?)+").expect("valid additional parameters regex"));

/// A single violated constraint: the field and its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub field: ConfigField,
    pub message: String,
}

/// Outcome of validating one config. Created fresh per validation call and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationResult {
    failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    pub fn new(failures: Vec<ValidationFailure>) -> Self {
        Self { failures }
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Violated constraints, in constraint declaration order.
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }
}

/// Evaluates a family's constraint set against concrete configs.
pub struct ConfigValidator {
    constraints: FieldConstraintSet,
}

impl ConfigValidator {
    /// Validator over a custom constraint set.
    pub fn new(constraints: FieldConstraintSet) -> Self {
        Self { constraints }
    }

    /// Build the standard rule set for an indexer family from its
    /// capability profile:
    ///
    /// - categories must be non-empty (when the family requires them)
    /// - base URL must be a valid absolute root URL
    /// - API path must be a "/"-prefixed path
    /// - API key is required exactly when the profile's host whitelist
    ///   matches the base URL
    /// - additional parameters, when present, must be "&key=value" groups
    pub fn for_profile(profile: &CapabilityProfile) -> Self {
        let mut constraints = FieldConstraintSet::new();

        if profile.requires_categories {
            constraints = constraints.non_empty(
                ConfigField::Categories,
                "'Categories' must be provided",
            );
        }

        let whitelist = profile.clone();
        let constraints = constraints
            .root_url(ConfigField::BaseUrl, "'Base Url' must be a valid URL")
            .url_path(
                ConfigField::ApiPath,
                "'Api Path' must be a valid path, usually \"/api\"",
            )
            .required_when(
                ConfigField::ApiKey,
                move |config| whitelist.requires_api_key(&config.base_url),
                "'API Key' must be provided for this indexer",
            )
            .matches(
                ConfigField::AdditionalParameters,
                ADDITIONAL_PARAMETERS.clone(),
                "'Additional Parameters' must be one or more \"&key=value\" groups",
            );

        Self::new(constraints)
    }

    /// Convenience: look up `family_id` in the process-wide registry and
    /// build its validator.
    pub fn for_family(family_id: &str) -> Result<Self, HuntsmanError> {
        let profile = lookup_capability_profile(family_id)?;
        Ok(Self::for_profile(&profile))
    }

    /// Validate `config`, reporting every violated constraint at once.
    pub fn validate(&self, config: &IndexerConfig) -> Result<ValidationResult, HuntsmanError> {
        let failures = self.constraints.evaluate(config)?;
        Ok(ValidationResult::new(failures))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn newznab_validator() -> ConfigValidator {
        ConfigValidator::for_profile(&CapabilityProfile::newznab())
    }

    fn valid_config() -> IndexerConfig {
        IndexerConfig::new("https://example.com").with_categories([5030, 5040])
    }

    #[test]
    fn test_empty_categories_always_fails() {
        let validator = newznab_validator();

        // Regardless of the other field values.
        let bare = IndexerConfig::new("https://example.com");
        let full = IndexerConfig::new("https://example.com")
            .with_api_key("key")
            .with_additional_parameters("&extended=1");

        for config in [bare, full] {
            let result = validator.validate(&config).unwrap();
            assert!(
                result
                    .failures()
                    .iter()
                    .any(|f| f.message == "'Categories' must be provided"),
                "missing categories failure for {config:?}"
            );
        }
    }

    #[test]
    fn test_whitelisted_host_requires_api_key() {
        let validator = newznab_validator();

        let mut config = valid_config();
        config.base_url = "https://nzb.su".to_string();
        config.api_key = Some(String::new());

        let result = validator.validate(&config).unwrap();
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].field, ConfigField::ApiKey);

        config.api_key = Some("X".to_string());
        assert!(validator.validate(&config).unwrap().is_valid());
    }

    #[test]
    fn test_whitelist_token_in_path_still_requires_api_key() {
        let validator = newznab_validator();

        let mut config = valid_config();
        config.base_url = "https://mirror.example.com/dognzb.cr".to_string();

        let result = validator.validate(&config).unwrap();
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].field, ConfigField::ApiKey);
    }

    #[test]
    fn test_api_key_optional_off_whitelist() {
        let validator = newznab_validator();
        let config = valid_config();
        assert!(config.api_key.is_none());
        assert!(validator.validate(&config).unwrap().is_valid());
    }

    #[test]
    fn test_additional_parameters_format() {
        let validator = newznab_validator();

        let ok = valid_config().with_additional_parameters("&a=1&b=2");
        assert!(validator.validate(&ok).unwrap().is_valid());

        let missing_ampersand = valid_config().with_additional_parameters("a=1");
        let result = validator.validate(&missing_ampersand).unwrap();
        assert_eq!(result.failures().len(), 1);
        assert_eq!(
            result.failures()[0].field,
            ConfigField::AdditionalParameters
        );

        let blank = valid_config().with_additional_parameters("");
        assert!(validator.validate(&blank).unwrap().is_valid());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let validator = newznab_validator();

        let mut config = IndexerConfig::new("not a url");
        config.api_path = "api".to_string();

        let first = validator.validate(&config).unwrap();
        let second = validator.validate(&config).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_valid());
    }

    #[test]
    fn test_scenario_whitelisted_host_missing_key_fails_only_on_api_key() {
        // baseUrl="https://nzb.su", default api path, categories=[5030],
        // apiKey="" => exactly one failure, on the API key.
        let validator = newznab_validator();

        let mut config = IndexerConfig::new("https://nzb.su").with_categories([5030]);
        config.api_key = Some(String::new());
        assert_eq!(config.api_path, "/api");

        let result = validator.validate(&config).unwrap();
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].field, ConfigField::ApiKey);
        assert!(result.failures()[0].message.contains("API Key"));
    }

    #[test]
    fn test_scenario_open_host_empty_categories_fails_only_on_categories() {
        // baseUrl="https://example.com", categories=[], apiKey absent =>
        // exactly one failure, on categories.
        let validator = newznab_validator();
        let config = IndexerConfig::new("https://example.com");

        let result = validator.validate(&config).unwrap();
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].field, ConfigField::Categories);
        assert_eq!(result.failures()[0].message, "'Categories' must be provided");
    }

    #[test]
    fn test_invalid_base_url_reported_as_failure_not_error() {
        let validator = newznab_validator();

        let mut config = valid_config();
        config.base_url = String::new();
        let result = validator.validate(&config).unwrap();
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].field, ConfigField::BaseUrl);

        config.base_url = "example.com".to_string();
        let result = validator.validate(&config).unwrap();
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].field, ConfigField::BaseUrl);
    }

    #[test]
    fn test_api_path_must_be_path_shaped() {
        let validator = newznab_validator();

        let mut config = valid_config();
        config.api_path = "api".to_string();
        let result = validator.validate(&config).unwrap();
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].field, ConfigField::ApiPath);

        config.api_path = "/newznab/api".to_string();
        assert!(validator.validate(&config).unwrap().is_valid());
    }

    #[test]
    fn test_for_family_uses_registry() {
        let validator = ConfigValidator::for_family("newznab").unwrap();
        let config = valid_config();
        assert!(validator.validate(&config).unwrap().is_valid());

        assert!(ConfigValidator::for_family("no-such-family").is_err());
    }
}
