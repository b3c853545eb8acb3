//! Error types for the indexer core
//!
//! Validation failures are not errors - they travel as data in a
//! [`ValidationResult`](crate::validator::ValidationResult) so a settings
//! form can show every problem at once. The variants here signal that a
//! call did not complete.

use thiserror::Error;

/// Errors raised by the indexer core.
#[derive(Debug, Error)]
pub enum HuntsmanError {
    /// A validated but incomplete configuration cannot produce a usable
    /// request. The caller should skip this indexer for the current search
    /// rather than abort the aggregation run.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A capability profile lookup missed for a family that should have
    /// been registered at startup. Indicates a bug in the host service,
    /// not bad user input.
    #[error("no capability profile registered for family '{0}'")]
    UnknownFamily(String),

    /// A constraint was declared against a field it cannot apply to
    /// (e.g. a pattern rule on the categories collection). Indicates a
    /// bug in a family's constraint set.
    #[error("constraint '{kind}' cannot apply to field '{field}'")]
    InvalidConstraint {
        kind: &'static str,
        field: &'static str,
    },
}
