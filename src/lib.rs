//! Huntsman - indexer capability and query resolution core
//!
//! Huntsman drives Newznab/Torznab-style search indexers for a media
//! aggregation service: it validates user-supplied indexer configurations,
//! resolves per-family capabilities (categories, credential requirements,
//! URL shape) and builds well-formed outbound search requests.
//!
//! The crate owns no I/O. HTTP transport, response parsing and persistence
//! live in the surrounding service; everything here is pure and synchronous.
//!
//! # Typical flow
//!
//! 1. Look up the [`CapabilityProfile`] for the indexer family.
//! 2. Validate the [`IndexerConfig`] with [`ConfigValidator`] - failures
//!    come back as data, one entry per violated rule, suitable for a
//!    settings form.
//! 3. On success, merge a [`SearchRequest`] into a [`RequestDescriptor`]
//!    with [`QueryBuilder`] and hand it to the transport.
//!
//! ```
//! use huntsman::{
//!     ConfigValidator, IndexerConfig, QueryBuilder, SearchRequest,
//!     lookup_capability_profile,
//! };
//!
//! # fn main() -> Result<(), huntsman::HuntsmanError> {
//! let profile = lookup_capability_profile("newznab")?;
//!
//! let mut config = IndexerConfig::new("https://api.nzbgeek.info");
//! config.api_key = Some("secret".into());
//! config.categories = [5030, 5040].into_iter().collect();
//!
//! let result = ConfigValidator::for_profile(&profile).validate(&config)?;
//! assert!(result.is_valid());
//!
//! let request = SearchRequest::tv_search("The Expanse").with_season_episode(1, Some("5"));
//! let descriptor = QueryBuilder::build(&config, &profile, &request)?;
//! assert!(descriptor.to_url().starts_with("https://api.nzbgeek.info/api?"));
//! # Ok(())
//! # }
//! ```

pub mod categories;
pub mod config;
pub mod constraint;
pub mod error;
pub mod profile;
pub mod query;
pub mod validator;

pub use config::{ConfigField, DEFAULT_API_PATH, IndexerConfig, TorznabExtension};
pub use constraint::{ConstraintKind, FieldConstraint, FieldConstraintSet};
pub use error::HuntsmanError;
pub use profile::{
    CapabilityProfile, ProfileRegistry, lookup_capability_profile, register_capability_profile,
};
pub use query::{QueryBuilder, QueryType, RequestDescriptor, SearchRequest};
pub use validator::{ConfigValidator, ValidationFailure, ValidationResult};
