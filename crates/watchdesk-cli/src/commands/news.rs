use serde::Serialize;
use serde_json::Value;
use watchdesk_core::{NewsArticle, SymbolSet};

use super::Service;
use crate::cli::NewsArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct NewsResponseData {
    symbols: Vec<String>,
    articles: Vec<NewsArticle>,
}

pub async fn run(args: &NewsArgs, service: &Service) -> Result<Value, CliError> {
    let symbols = SymbolSet::parse(&args.symbols)?;
    let articles = service.news().get_news(&symbols).await?;

    Ok(serde_json::to_value(NewsResponseData {
        symbols: symbols.iter().map(ToString::to_string).collect(),
        articles,
    })?)
}
