//! Grid-subsystem error type.

use thiserror::Error;

/// Errors produced by `egress-grid`.
///
/// Rasterization itself never fails — bad geometry clips silently.  The only
/// failure mode is a configuration that cannot describe a grid at all, and
/// that is rejected fail-fast at [`Rasterizer::new`](crate::Rasterizer::new).
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid grid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type GridResult<T> = Result<T, GridError>;
