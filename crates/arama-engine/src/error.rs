//! Error types for the query executor.

use thiserror::Error;

/// Failures absorbed at the engine boundary.
///
/// These never escape the engine's mutator API; they are passed to the
/// configured report hook (or logged) while the state degrades to an empty
/// result set. The engine stays usable for the next query.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The injected remote-search delegate failed.
    #[error("search delegate failed: {0}")]
    Delegate(anyhow::Error),
}
