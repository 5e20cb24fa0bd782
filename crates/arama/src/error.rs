//! Error types for the arama core.

use thiserror::Error;

/// Errors produced when parsing filter and sort tokens from their wire names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Operator name not in the filter operator table.
    #[error("unknown filter operator '{0}'")]
    UnknownOperator(String),

    /// Sort direction other than `asc`/`desc`.
    #[error("unknown sort direction '{0}'")]
    UnknownDirection(String),
}
