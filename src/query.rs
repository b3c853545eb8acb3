//! Outbound search request building
//!
//! [`QueryBuilder`] merges a generic [`SearchRequest`] with a validated
//! [`IndexerConfig`] and the family's [`CapabilityProfile`] into a
//! [`RequestDescriptor`] - the URL plus query parameters the transport
//! layer issues as an HTTP GET. The builder trusts that the config passed
//! validation; it does not re-validate.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::categories::get_category;
use crate::config::IndexerConfig;
use crate::error::HuntsmanError;
use crate::profile::{CapabilityProfile, lookup_capability_profile};

/// Type of search query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// General text search
    #[default]
    Search,
    /// TV show search (supports season/episode)
    TvSearch,
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryType::Search => write!(f, "search"),
            QueryType::TvSearch => write!(f, "tvsearch"),
        }
    }
}

impl std::str::FromStr for QueryType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "search" | "q" => Ok(QueryType::Search),
            "tvsearch" | "tv-search" | "tv" => Ok(QueryType::TvSearch),
            _ => Err(anyhow::anyhow!("Unknown query type: {}", s)),
        }
    }
}

/// A generic search request, independent of any indexer.
///
/// Ephemeral - one per search invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The type of search
    pub query_type: QueryType,

    /// Free-text search term
    pub search_term: Option<String>,

    /// Categories to search in; empty falls back to the config's
    /// categories, then to the profile's defaults
    pub categories: BTreeSet<i32>,

    /// Season number (TV search)
    pub season: Option<i32>,
    /// Episode number/identifier (TV search)
    pub episode: Option<String>,

    /// Maximum number of results
    pub limit: Option<i32>,
    /// Offset for pagination
    pub offset: Option<i32>,

    /// Request-specific query parameters. These win over the config's
    /// additional parameters on key collision.
    pub params: HashMap<String, String>,
}

impl SearchRequest {
    /// Create a new search query
    pub fn search(term: &str) -> Self {
        Self {
            query_type: QueryType::Search,
            search_term: Some(term.to_string()),
            ..Default::default()
        }
    }

    /// Create a TV search query
    pub fn tv_search(term: &str) -> Self {
        Self {
            query_type: QueryType::TvSearch,
            search_term: Some(term.to_string()),
            ..Default::default()
        }
    }

    /// Add season/episode to a TV search
    pub fn with_season_episode(mut self, season: i32, episode: Option<&str>) -> Self {
        self.season = Some(season);
        self.episode = episode.map(|s| s.to_string());
        self
    }

    /// Add categories to the query
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = i32>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Add a request-specific query parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// A fully resolved outbound request: endpoint URL plus query parameters.
///
/// Consumed by the external HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// Endpoint URL without a query string
    pub url: String,
    /// Query parameters; keys are unique, iteration order is stable
    pub query_parameters: BTreeMap<String, String>,
}

impl RequestDescriptor {
    /// Render the full GET URL with percent-encoded parameter values.
    pub fn to_url(&self) -> String {
        let mut url = self.url.clone();
        let mut separator = '?';

        for (key, value) in &self.query_parameters {
            url.push(separator);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            separator = '&';
        }

        url
    }
}

/// Builds outbound request descriptors from validated configs.
pub struct QueryBuilder;

impl QueryBuilder {
    /// Merge `request` with `config` and `profile` into a request
    /// descriptor.
    ///
    /// The config must already have passed validation for the family; the
    /// builder does not re-check it. Fails with
    /// [`HuntsmanError::Configuration`] when no usable category set can be
    /// resolved and the family requires one.
    pub fn build(
        config: &IndexerConfig,
        profile: &CapabilityProfile,
        request: &SearchRequest,
    ) -> Result<RequestDescriptor, HuntsmanError> {
        let categories = Self::resolve_categories(config, profile, request)?;
        let url = format!("{}{}", config.base_url.trim_end_matches('/'), config.api_path);

        let mut params: BTreeMap<String, String> = BTreeMap::new();

        // Configured additional parameters go in first so that everything
        // request-scoped wins on key collision.
        if let Some(ref additional) = config.additional_parameters {
            for (key, value) in parse_additional_parameters(additional) {
                params.insert(key, value);
            }
        }

        params.insert("t".to_string(), request.query_type.to_string());

        if let Some(ref term) = request.search_term {
            params.insert("q".to_string(), term.clone());
        }

        if !categories.is_empty() {
            let cats: String = categories
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.insert("cat".to_string(), cats);
        }

        if let Some(season) = request.season {
            params.insert("season".to_string(), season.to_string());
        }
        if let Some(ref episode) = request.episode {
            params.insert("ep".to_string(), episode.clone());
        }

        if let Some(ref api_key) = config.api_key {
            if !api_key.is_empty() {
                params.insert("apikey".to_string(), api_key.clone());
            }
        }

        if let Some(limit) = request.limit {
            params.insert("limit".to_string(), limit.to_string());
        }
        if let Some(offset) = request.offset {
            params.insert("offset".to_string(), offset.to_string());
        }

        // Explicit request parameters are the caller's override channel.
        for (key, value) in &request.params {
            params.insert(key.clone(), value.clone());
        }

        debug!(
            family_id = %profile.family_id,
            url = %url,
            query_type = %request.query_type,
            categories = categories.len(),
            "Built search request"
        );

        Ok(RequestDescriptor {
            url,
            query_parameters: params,
        })
    }

    /// Convenience: look up `family_id` in the process-wide registry and
    /// build against its profile.
    pub fn build_for_family(
        config: &IndexerConfig,
        family_id: &str,
        request: &SearchRequest,
    ) -> Result<RequestDescriptor, HuntsmanError> {
        let profile = lookup_capability_profile(family_id)?;
        Self::build(config, &profile, request)
    }

    /// Resolve the effective category set: request categories, then config
    /// categories, then the profile's defaults.
    fn resolve_categories(
        config: &IndexerConfig,
        profile: &CapabilityProfile,
        request: &SearchRequest,
    ) -> Result<Vec<i32>, HuntsmanError> {
        let resolved: Vec<i32> = if !request.categories.is_empty() {
            request.categories.iter().copied().collect()
        } else if !config.categories.is_empty() {
            config.categories.iter().copied().collect()
        } else {
            profile.default_categories.clone()
        };

        if resolved.is_empty() && profile.requires_categories {
            return Err(HuntsmanError::Configuration(format!(
                "no categories resolvable for family '{}'",
                profile.family_id
            )));
        }

        for &category in &resolved {
            if get_category(category).is_none() {
                debug!(category, "Category code not in the standard Torznab table");
            }
        }

        Ok(resolved)
    }
}

/// Split an "&k1=v1&k2=v2" additional-parameters string into pairs.
///
/// Groups without an "=" are dropped; the validator has already rejected
/// strings that are not made of "&key=value" groups.
fn parse_additional_parameters(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|group| !group.is_empty())
        .filter_map(|group| {
            group
                .split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
        })
        .collect()
}
