//! Capability profiles and the family registry
//!
//! A [`CapabilityProfile`] carries the static knowledge about one indexer
//! family: default categories, default API path, and which hosts refuse
//! anonymous API access. Profiles are registered once at process start and
//! read-only afterwards, so lookups from concurrent workers need no
//! coordination.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::categories::cats;
use crate::config::DEFAULT_API_PATH;
use crate::error::HuntsmanError;

/// Static knowledge about one indexer family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityProfile {
    /// Unique family identifier (e.g., "newznab")
    pub family_id: String,
    /// Categories applied when neither the request nor the config names any
    pub default_categories: Vec<i32>,
    /// API path applied when the user leaves it blank
    pub default_api_path: String,
    /// Hosts that refuse anonymous API access. A base URL containing any of
    /// these entries (case-insensitive substring, matched against the whole
    /// URL rather than just its host) makes the API key mandatory.
    pub host_api_key_whitelist: Vec<String>,
    /// Whether a search against this family must carry at least one category
    pub requires_categories: bool,
}

impl CapabilityProfile {
    /// Create an empty profile for `family_id` with the standard API path.
    pub fn new(family_id: impl Into<String>) -> Self {
        Self {
            family_id: family_id.into(),
            default_categories: Vec::new(),
            default_api_path: DEFAULT_API_PATH.to_string(),
            host_api_key_whitelist: Vec::new(),
            requires_categories: true,
        }
    }

    /// Built-in profile for Newznab-compatible Usenet indexers.
    pub fn newznab() -> Self {
        Self {
            family_id: "newznab".to_string(),
            default_categories: vec![
                cats::XXX,
                cats::XXX_DVD,
                cats::XXX_WMV,
                cats::XXX_XVID,
                cats::XXX_X264,
                cats::XXX_UHD,
                cats::XXX_PACK,
                cats::XXX_OTHER,
                cats::XXX_SD,
                cats::XXX_WEBDL,
            ],
            default_api_path: DEFAULT_API_PATH.to_string(),
            host_api_key_whitelist: [
                "nzbs.org",
                "nzb.su",
                "dognzb.cr",
                "nzbplanet.net",
                "nzbid.org",
                "nzbndx.com",
                "nzbindex.in",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            requires_categories: true,
        }
    }

    /// Built-in profile for Torznab-compatible torrent indexers.
    ///
    /// Same API shape as Newznab; no host is known to force an API key, so
    /// the key stays optional unless the whitelist is extended.
    pub fn torznab() -> Self {
        Self {
            family_id: "torznab".to_string(),
            default_categories: Self::newznab().default_categories,
            default_api_path: DEFAULT_API_PATH.to_string(),
            host_api_key_whitelist: Vec::new(),
            requires_categories: true,
        }
    }

    /// Whether configs for this family must provide an API key, given the
    /// configured base URL.
    ///
    /// An absent or empty base URL never triggers the requirement. The
    /// whitelist test is a deliberately loose substring match - a token
    /// appearing anywhere in the URL counts, not just in the host.
    pub fn requires_api_key(&self, base_url: &str) -> bool {
        if base_url.is_empty() {
            return false;
        }

        let url = base_url.to_lowercase();
        self.host_api_key_whitelist
            .iter()
            .any(|host| url.contains(&host.to_lowercase()))
    }
}

/// Registry of capability profiles, one per indexer family.
///
/// Populated at process start; reads after that are unsynchronized-safe
/// because registered profiles are never mutated, only replaced wholesale.
#[derive(Default)]
pub struct ProfileRegistry {
    profiles: RwLock<HashMap<String, Arc<CapabilityProfile>>>,
}

impl ProfileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-seeded with the built-in families.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(CapabilityProfile::newznab());
        registry.register(CapabilityProfile::torznab());
        registry
    }

    /// Register a family's profile. Re-registration replaces the previous
    /// profile (last write wins).
    pub fn register(&self, profile: CapabilityProfile) {
        let family_id = profile.family_id.clone();
        let previous = self
            .profiles
            .write()
            .insert(family_id.clone(), Arc::new(profile));

        if previous.is_some() {
            warn!(family_id = %family_id, "Replaced capability profile");
        } else {
            debug!(family_id = %family_id, "Registered capability profile");
        }
    }

    /// Look up a family's profile.
    ///
    /// A miss means the host never registered the family - a deployment
    /// bug, reported as [`HuntsmanError::UnknownFamily`] rather than a
    /// silent default.
    pub fn lookup(&self, family_id: &str) -> Result<Arc<CapabilityProfile>, HuntsmanError> {
        self.profiles
            .read()
            .get(family_id)
            .cloned()
            .ok_or_else(|| HuntsmanError::UnknownFamily(family_id.to_string()))
    }

    /// Family ids currently registered, in no particular order.
    pub fn family_ids(&self) -> Vec<String> {
        self.profiles.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileRegistry")
            .field("families", &self.profiles.read().len())
            .finish()
    }
}

/// Process-wide registry, pre-seeded with the built-in families.
static REGISTRY: Lazy<ProfileRegistry> = Lazy::new(ProfileRegistry::with_builtins);

/// Register `profile` in the process-wide registry. Called once per
/// supported family at startup.
pub fn register_capability_profile(profile: CapabilityProfile) {
    REGISTRY.register(profile);
}

/// Look up a family in the process-wide registry.
pub fn lookup_capability_profile(
    family_id: &str,
) -> Result<Arc<CapabilityProfile>, HuntsmanError> {
    REGISTRY.lookup(family_id)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_requires_api_key_substring_match() {
        let profile = CapabilityProfile::newznab();

        assert!(profile.requires_api_key("https://nzb.su"));
        assert!(profile.requires_api_key("https://api.nzbplanet.net/newznab"));
        assert!(!profile.requires_api_key("https://example.com"));
    }

    #[test]
    fn test_requires_api_key_is_case_insensitive() {
        let profile = CapabilityProfile::newznab();
        assert!(profile.requires_api_key("https://NZB.SU"));
        assert!(profile.requires_api_key("HTTPS://DogNZB.cr/api"));
    }

    #[test]
    fn test_requires_api_key_matches_tokens_outside_the_host() {
        // The whitelist test is a substring match against the whole URL;
        // a token in the path still triggers the requirement.
        let profile = CapabilityProfile::newznab();
        assert!(profile.requires_api_key("https://proxy.example.com/nzb.su/feed"));
    }

    #[test]
    fn test_requires_api_key_empty_base_url_never_triggers() {
        let profile = CapabilityProfile::newznab();
        assert!(!profile.requires_api_key(""));
    }

    #[test]
    fn test_registry_lookup_unknown_family_errors() {
        let registry = ProfileRegistry::with_builtins();
        assert!(registry.lookup("newznab").is_ok());
        assert_matches!(
            registry.lookup("gazelle"),
            Err(HuntsmanError::UnknownFamily(family)) if family == "gazelle"
        );
    }

    #[test]
    fn test_registry_reregistration_replaces() {
        let registry = ProfileRegistry::new();
        registry.register(CapabilityProfile::newznab());

        let mut replacement = CapabilityProfile::newznab();
        replacement.default_categories = vec![5000];
        registry.register(replacement);

        let profile = registry.lookup("newznab").unwrap();
        assert_eq!(profile.default_categories, vec![5000]);
        assert_eq!(registry.family_ids().len(), 1);
    }

    #[test]
    fn test_builtin_newznab_defaults() {
        let profile = CapabilityProfile::newznab();
        assert_eq!(profile.default_api_path, "/api");
        assert_eq!(
            profile.default_categories,
            vec![6000, 6010, 6020, 6030, 6040, 6045, 6050, 6070, 6080, 6090]
        );
        assert_eq!(profile.host_api_key_whitelist.len(), 7);
    }
}
