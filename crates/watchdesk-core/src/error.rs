use thiserror::Error;

use crate::data_source::ProviderError;

/// Validation and contract errors exposed by `watchdesk-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("timestamp must be RFC3339: '{value}'")]
    InvalidTimestamp { value: String },

    #[error("search query must not be empty")]
    EmptyQuery,

    #[error("alert threshold must be a positive finite number, got {value}")]
    InvalidThreshold { value: String },
}

/// Configuration errors. These are never masked as empty data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("market data API key is not configured (set {variables})")]
    MissingApiKey { variables: &'static str },

    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        variable: &'static str,
        value: String,
        reason: String,
    },
}

/// Top-level error type for coordinator operations.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
