//! Engine error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `EgressError` via `From` impls, or keep them separate.  "No path found"
//! is deliberately NOT an error anywhere in this workspace: an exhausted
//! search frontier is an expected, frequent state during a live fire event
//! and is represented as an empty path with infinite distance.

use thiserror::Error;

/// The top-level error type for `egress-core` and a common base for
/// sub-crates.
#[derive(Debug, Error)]
pub enum EgressError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `egress-*` crates.
pub type EgressResult<T> = Result<T, EgressError>;
