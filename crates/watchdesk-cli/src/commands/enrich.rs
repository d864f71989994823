use serde::Serialize;
use serde_json::Value;
use watchdesk_core::{EnrichedStock, SymbolSet};

use super::Service;
use crate::cli::EnrichArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct EnrichResponseData {
    stocks: Vec<EnrichedStock>,
}

pub async fn run(args: &EnrichArgs, service: &Service) -> Result<Value, CliError> {
    let symbols = SymbolSet::parse(&args.symbols)?;
    let mut enriched = service.enricher().enrich(&symbols).await?;

    // Report in the order symbols were given.
    let stocks = symbols
        .iter()
        .filter_map(|symbol| enriched.remove(symbol))
        .collect();

    Ok(serde_json::to_value(EnrichResponseData { stocks })?)
}
