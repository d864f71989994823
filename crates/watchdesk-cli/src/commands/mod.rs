mod enrich;
mod news;
mod search;
mod view;

use std::sync::Arc;

use serde_json::Value;
use watchdesk_core::{
    CachePolicy, CachedSource, FinnhubAdapter, MarketDataSource, WatchdeskConfig,
    WatchlistService,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub type Service = WatchlistService<dyn MarketDataSource>;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let service = build_service(cli)?;

    match &cli.command {
        Command::Enrich(args) => enrich::run(args, &service).await,
        Command::News(args) => news::run(args, &service).await,
        Command::Search(args) => search::run(args, &service).await,
        Command::View(args) => view::run(args, &service).await,
    }
}

/// Environment configuration with command-line overrides applied.
pub fn resolve_config(cli: &Cli) -> Result<WatchdeskConfig, CliError> {
    let mut config = WatchdeskConfig::from_env()?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms.max(1));
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.trim());
    }
    Ok(config)
}

fn build_service(cli: &Cli) -> Result<Service, CliError> {
    let config = resolve_config(cli)?;
    tracing::debug!(?config, "resolved configuration");

    let adapter = FinnhubAdapter::from_config(&config);
    let source: Arc<dyn MarketDataSource> =
        Arc::new(CachedSource::new(adapter, CachePolicy::default()));
    Ok(WatchlistService::new(source))
}
