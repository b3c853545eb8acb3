//! Declarative field constraints
//!
//! Each indexer family declares which configuration fields must satisfy
//! which rule. A [`FieldConstraintSet`] is built once per family at startup
//! and evaluated by a small interpreter. Every constraint is checked
//! independently and failures accumulate - a single validation pass reports
//! every problem at once, which is what a settings form needs.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use url::Url;

use crate::config::{ConfigField, IndexerConfig};
use crate::error::HuntsmanError;
use crate::validator::ValidationFailure;

/// Predicate over the whole config, used by conditional rules. Conditions
/// like "is the API key required" depend on more than the field itself.
pub type ConfigPredicate = Arc<dyn Fn(&IndexerConfig) -> bool + Send + Sync>;

/// The rule a single constraint enforces.
#[derive(Clone)]
pub enum ConstraintKind {
    /// Field must be present and non-blank.
    Required,
    /// Field must be present and non-blank whenever the predicate holds.
    ConditionalRequired(ConfigPredicate),
    /// A non-blank field must match the regex. Blank means "not provided"
    /// and passes - it is not a format error.
    Pattern(Regex),
    /// Collection field must contain at least one entry.
    NonEmptyCollection,
    /// Field must be a syntactically valid absolute http(s) URL.
    RootUrl,
    /// Field must be a URL path starting with "/".
    UrlPath,
}

impl ConstraintKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::Required => "required",
            ConstraintKind::ConditionalRequired(_) => "conditional required",
            ConstraintKind::Pattern(_) => "pattern",
            ConstraintKind::NonEmptyCollection => "non-empty collection",
            ConstraintKind::RootUrl => "root url",
            ConstraintKind::UrlPath => "url path",
        }
    }
}

impl fmt::Debug for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declarative validation rule for one config field.
#[derive(Debug, Clone)]
pub struct FieldConstraint {
    pub field: ConfigField,
    pub kind: ConstraintKind,
    pub message: String,
}

impl FieldConstraint {
    /// Whether the constraint holds for `config`.
    ///
    /// Errors only when the constraint kind cannot apply to the field's
    /// shape - a bug in the constraint set, never a property of the input.
    fn check(&self, config: &IndexerConfig) -> Result<bool, HuntsmanError> {
        match (&self.kind, field_value(self.field, config)) {
            (ConstraintKind::Required, FieldValue::Text(text)) => Ok(!is_blank(text)),
            (ConstraintKind::ConditionalRequired(predicate), FieldValue::Text(text)) => {
                Ok(!predicate(config) || !is_blank(text))
            }
            (ConstraintKind::Pattern(regex), FieldValue::Text(text)) => match text {
                Some(value) if !value.trim().is_empty() => Ok(regex.is_match(value)),
                _ => Ok(true),
            },
            (ConstraintKind::RootUrl, FieldValue::Text(text)) => {
                Ok(text.is_some_and(is_root_url))
            }
            (ConstraintKind::UrlPath, FieldValue::Text(text)) => Ok(text.is_some_and(is_url_path)),
            (ConstraintKind::NonEmptyCollection, FieldValue::Collection(items)) => {
                Ok(!items.is_empty())
            }
            (kind, _) => Err(HuntsmanError::InvalidConstraint {
                kind: kind.name(),
                field: self.field.label(),
            }),
        }
    }
}

/// Ordered list of constraints for one indexer family.
///
/// Immutable once built; families construct theirs at startup and share it
/// across validations.
#[derive(Debug, Clone, Default)]
pub struct FieldConstraintSet {
    constraints: Vec<FieldConstraint>,
}

impl FieldConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to be present and non-blank.
    pub fn required(self, field: ConfigField, message: impl Into<String>) -> Self {
        self.push(field, ConstraintKind::Required, message)
    }

    /// Require `field` whenever `predicate` holds for the config.
    pub fn required_when<P>(
        self,
        field: ConfigField,
        predicate: P,
        message: impl Into<String>,
    ) -> Self
    where
        P: Fn(&IndexerConfig) -> bool + Send + Sync + 'static,
    {
        self.push(
            field,
            ConstraintKind::ConditionalRequired(Arc::new(predicate)),
            message,
        )
    }

    /// Require a non-blank `field` to match `regex`.
    pub fn matches(self, field: ConfigField, regex: Regex, message: impl Into<String>) -> Self {
        self.push(field, ConstraintKind::Pattern(regex), message)
    }

    /// Require the collection `field` to be non-empty.
    pub fn non_empty(self, field: ConfigField, message: impl Into<String>) -> Self {
        self.push(field, ConstraintKind::NonEmptyCollection, message)
    }

    /// Require `field` to be a valid absolute http(s) URL.
    pub fn root_url(self, field: ConfigField, message: impl Into<String>) -> Self {
        self.push(field, ConstraintKind::RootUrl, message)
    }

    /// Require `field` to be a URL path starting with "/".
    pub fn url_path(self, field: ConfigField, message: impl Into<String>) -> Self {
        self.push(field, ConstraintKind::UrlPath, message)
    }

    fn push(mut self, field: ConfigField, kind: ConstraintKind, message: impl Into<String>) -> Self {
        self.constraints.push(FieldConstraint {
            field,
            kind,
            message: message.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Evaluate every constraint against `config`, in declaration order.
    ///
    /// Failures accumulate - no early exit. The only error condition is a
    /// mis-shaped constraint, which is fatal rather than skipped.
    pub fn evaluate(&self, config: &IndexerConfig) -> Result<Vec<ValidationFailure>, HuntsmanError> {
        let mut failures = Vec::new();

        for constraint in &self.constraints {
            if !constraint.check(config)? {
                failures.push(ValidationFailure {
                    field: constraint.field,
                    message: constraint.message.clone(),
                });
            }
        }

        Ok(failures)
    }
}

/// The shape-aware value of a config field.
enum FieldValue<'a> {
    Text(Option<&'a str>),
    Collection(&'a std::collections::BTreeSet<i32>),
}

fn field_value(field: ConfigField, config: &IndexerConfig) -> FieldValue<'_> {
    match field {
        ConfigField::BaseUrl => FieldValue::Text(Some(config.base_url.as_str())),
        ConfigField::ApiPath => FieldValue::Text(Some(config.api_path.as_str())),
        ConfigField::ApiKey => FieldValue::Text(config.api_key.as_deref()),
        ConfigField::AdditionalParameters => {
            FieldValue::Text(config.additional_parameters.as_deref())
        }
        ConfigField::Categories => FieldValue::Collection(&config.categories),
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn is_root_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => url.has_host() && matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

fn is_url_path(value: &str) -> bool {
    !value.trim().is_empty()
        && value.starts_with('/')
        && !value.contains(char::is_whitespace)
        && !value.contains(['?', '#'])
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    fn blank_config() -> IndexerConfig {
        let mut config = IndexerConfig::new("");
        config.api_path = String::new();
        config
    }

    #[test]
    fn test_failures_accumulate_without_early_exit() {
        let constraints = FieldConstraintSet::new()
            .root_url(ConfigField::BaseUrl, "'Base Url' must be a valid URL")
            .url_path(ConfigField::ApiPath, "'Api Path' must start with /")
            .non_empty(ConfigField::Categories, "'Categories' must be provided");

        let failures = constraints.evaluate(&blank_config()).unwrap();
        assert_eq!(failures.len(), 3);
        assert_eq!(failures[0].field, ConfigField::BaseUrl);
        assert_eq!(failures[1].field, ConfigField::ApiPath);
        assert_eq!(failures[2].field, ConfigField::Categories);
    }

    #[test]
    fn test_pattern_skipped_for_blank_value() {
        let constraints = FieldConstraintSet::new().matches(
            ConfigField::AdditionalParameters,
            Regex::new(r"(&.+?=.+?)+").unwrap(),
            "bad format",
        );

        let mut config = IndexerConfig::new("https://example.com");
        assert!(constraints.evaluate(&config).unwrap().is_empty());

        config.additional_parameters = Some("   ".to_string());
        assert!(constraints.evaluate(&config).unwrap().is_empty());

        config.additional_parameters = Some("a=1".to_string());
        assert_eq!(constraints.evaluate(&config).unwrap().len(), 1);
    }

    #[test]
    fn test_conditional_required_consults_whole_config() {
        let constraints = FieldConstraintSet::new().required_when(
            ConfigField::ApiKey,
            |c: &IndexerConfig| c.base_url.contains("private"),
            "'API Key' must be provided",
        );

        let open = IndexerConfig::new("https://public.example.com");
        assert!(constraints.evaluate(&open).unwrap().is_empty());

        let gated = IndexerConfig::new("https://private.example.com");
        let failures = constraints.evaluate(&gated).unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, ConfigField::ApiKey);
    }

    #[test]
    fn test_mis_shaped_constraint_is_fatal() {
        let constraints = FieldConstraintSet::new().matches(
            ConfigField::Categories,
            Regex::new(r"\d+").unwrap(),
            "unreachable",
        );

        let result = constraints.evaluate(&IndexerConfig::new("https://example.com"));
        assert_matches!(
            result,
            Err(HuntsmanError::InvalidConstraint { kind: "pattern", .. })
        );
    }

    #[test]
    fn test_root_url_rejects_relative_and_non_http() {
        assert!(is_root_url("https://nzb.su"));
        assert!(is_root_url("http://indexer.local:8080/base"));
        assert!(!is_root_url(""));
        assert!(!is_root_url("nzb.su"));
        assert!(!is_root_url("ftp://nzb.su"));
        assert!(!is_root_url("/api"));
    }

    #[test]
    fn test_url_path_shape() {
        assert!(is_url_path("/api"));
        assert!(is_url_path("/newznab/api"));
        assert!(!is_url_path(""));
        assert!(!is_url_path("api"));
        assert!(!is_url_path("/api?t=caps"));
        assert!(!is_url_path("/api path"));
    }
}
