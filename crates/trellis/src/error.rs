//! Error types for the layout engine.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the layout engine. Geometry underflow is never an error:
/// dimension arithmetic saturates at zero. Structural problems that can be
/// recovered from (such as a grid with a short last row) are logged instead.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The widget tree was assembled incorrectly: a stale or foreign handle,
    /// a child attached under a widget that cannot host children, or a
    /// second child attached to a single-child wrapper. Fatal, not retried.
    #[error("configuration: {0}")]
    Configuration(String),
}
