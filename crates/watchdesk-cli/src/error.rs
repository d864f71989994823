use std::path::PathBuf;

use thiserror::Error;
use watchdesk_core::{ConfigError, ProviderError, ValidationError, WatchError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("invalid watchlist file {}: {source}", path.display())]
    WatchlistFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<WatchError> for CliError {
    fn from(error: WatchError) -> Self {
        match error {
            WatchError::Configuration(error) => Self::Config(error),
            WatchError::Provider(error) => Self::Provider(error),
            WatchError::Validation(error) => Self::Validation(error),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::WatchlistFile { .. } => 2,
            Self::Config(_) => 3,
            Self::Provider(_) => 4,
            Self::Serialization(_) => 5,
            Self::Io(_) => 10,
        }
    }
}
