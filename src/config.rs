//! Indexer configuration types
//!
//! An [`IndexerConfig`] holds the user-editable settings for one configured
//! indexer. Instances arrive from the persistence layer, are validated once
//! per save and treated as read-only until edited again - the core never
//! retains one beyond a call.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default API path for Newznab-compatible endpoints.
pub const DEFAULT_API_PATH: &str = "/api";

/// User-supplied configuration for a single indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Root URL of the indexer site (e.g., "https://api.nzbgeek.info")
    pub base_url: String,
    /// Path to the API endpoint, usually "/api"
    pub api_path: String,
    /// API key, if the site requires one
    pub api_key: Option<String>,
    /// Torznab category codes to scope searches to
    pub categories: BTreeSet<i32>,
    /// Extra query parameters appended to every request, written as one or
    /// more "&key=value" groups (e.g., "&extended=1&maxage=365")
    pub additional_parameters: Option<String>,
    /// Torznab-specific settings; absent for plain Newznab indexers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torznab: Option<TorznabExtension>,
}

impl IndexerConfig {
    /// Create a config for `base_url` with the default API path applied.
    ///
    /// The default is applied here, at construction time - validation sees
    /// whatever value is currently set.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: DEFAULT_API_PATH.to_string(),
            api_key: None,
            categories: BTreeSet::new(),
            additional_parameters: None,
            torznab: None,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the search categories
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = i32>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Set the additional query parameters string
    pub fn with_additional_parameters(mut self, params: impl Into<String>) -> Self {
        self.additional_parameters = Some(params.into());
        self
    }

    /// Attach Torznab-specific settings
    pub fn with_torznab(mut self, extension: TorznabExtension) -> Self {
        self.torznab = Some(extension);
        self
    }
}

/// Torznab-specific configuration, composed alongside the base config
/// instead of sharing its field layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorznabExtension {
    /// Minimum seeders a release needs before it is considered
    pub minimum_seeders: u32,
}

impl Default for TorznabExtension {
    fn default() -> Self {
        Self { minimum_seeders: 1 }
    }
}

/// The validatable fields of an [`IndexerConfig`].
///
/// Constraints address fields through this enum rather than by name, so a
/// constraint referencing a nonexistent field is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    BaseUrl,
    ApiPath,
    ApiKey,
    Categories,
    AdditionalParameters,
}

impl ConfigField {
    /// Display label used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            ConfigField::BaseUrl => "Base Url",
            ConfigField::ApiPath => "Api Path",
            ConfigField::ApiKey => "API Key",
            ConfigField::Categories => "Categories",
            ConfigField::AdditionalParameters => "Additional Parameters",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_api_path_applied_at_construction() {
        let config = IndexerConfig::new("https://example.com");
        assert_eq!(config.api_path, "/api");
        assert!(config.api_key.is_none());
        assert!(config.categories.is_empty());
    }

    #[test]
    fn test_torznab_extension_roundtrip() {
        let config = IndexerConfig::new("https://tracker.example.com")
            .with_categories([5030, 5040])
            .with_torznab(TorznabExtension { minimum_seeders: 3 });

        let json = serde_json::to_string(&config).unwrap();
        let restored: IndexerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
        assert_eq!(restored.torznab.unwrap().minimum_seeders, 3);
    }

    #[test]
    fn test_torznab_extension_absent_for_newznab() {
        let config = IndexerConfig::new("https://api.nzbgeek.info");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("torznab"));

        let restored: IndexerConfig = serde_json::from_str(&json).unwrap();
        assert!(restored.torznab.is_none());
    }
}
