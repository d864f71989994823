use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use watchdesk_core::{AlertRecord, WatchlistEntry};

use super::Service;
use crate::cli::ViewArgs;
use crate::error::CliError;

/// On-disk watchlist: the rows the persistence layer would supply.
#[derive(Debug, Default, Deserialize)]
pub struct WatchlistFile {
    #[serde(default)]
    pub entries: Vec<WatchlistEntry>,
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
}

impl WatchlistFile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path)?;
        let file: Self = serde_json::from_str(&raw).map_err(|source| CliError::WatchlistFile {
            path: path.to_path_buf(),
            source,
        })?;

        for alert in &file.alerts {
            alert.validate()?;
        }
        Ok(file)
    }
}

pub async fn run(args: &ViewArgs, service: &Service) -> Result<Value, CliError> {
    let file = WatchlistFile::load(&args.file)?;
    let view = service.view(&file.entries, &file.alerts).await?;
    Ok(serde_json::to_value(view)?)
}
