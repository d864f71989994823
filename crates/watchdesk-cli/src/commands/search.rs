use serde::Serialize;
use serde_json::Value;
use watchdesk_core::{StockSearchHit, SymbolSet};

use super::Service;
use crate::cli::SearchArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct SearchResponseData {
    query: Option<String>,
    results: Vec<StockSearchHit>,
}

pub async fn run(args: &SearchArgs, service: &Service) -> Result<Value, CliError> {
    let watchlist = SymbolSet::parse_lenient(&args.watchlist);
    let query = args
        .query
        .as_deref()
        .map(str::trim)
        .filter(|query| !query.is_empty());

    let results = service.search().search(query, &watchlist).await?;

    Ok(serde_json::to_value(SearchResponseData {
        query: query.map(str::to_owned),
        results,
    })?)
}
