//! Typed error kinds carried inside [`eyre::Report`]s.
//!
//! Operations return `eyre::Result`, and callers that need to tell the failure modes apart
//! recover these with [`eyre::Report::downcast_ref`].

use thiserror::Error;

/// Failures when turning a channel handle into a [`crate::ResolvedChannel`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The lookup returned more than one channel for a handle that should be unique.
    #[error("{count} channels returned for handle {handle}, handle is ambiguous")]
    Ambiguous { handle: String, count: usize },
    /// The lookup returned no channel at all.
    #[error("no channel found for handle {handle}")]
    NotFound { handle: String },
}

/// A response item did not have the shape we flatten from.
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("malformed {kind} item")]
    InvalidItem {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("schema mismatch: expected columns [{expected}], got [{actual}]")]
    SchemaMismatch { expected: String, actual: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no YouTube API key configured")]
    MissingApiKey,
    #[error("{name} must be between 1 and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        max: usize,
        value: usize,
    },
}
