//! News slate selection.
//!
//! | Mode | Trigger | Selection |
//! |------|---------|-----------|
//! | Symbol | non-empty symbol set | per-symbol company news, round-robin, newest first |
//! | General | empty set, or symbol mode selected nothing | general feed, deduplicated, provider order |
//!
//! Per-symbol fetch failures count as empty feeds. A failure of the general
//! feed is returned to the caller.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::config::NewsPolicy;
use crate::data_source::{DateRange, MarketDataSource};
use crate::fanout::Branch;
use crate::format::truncate_chars;
use crate::{NewsArticle, NewsCategory, RawNewsArticle, Symbol, SymbolSet, WatchError};

const COMPANY_SOURCE: &str = "Company News";
const GENERAL_SOURCE: &str = "Market News";

/// Builds the news slate for a watchlist.
pub struct NewsAggregator<S: ?Sized> {
    source: Arc<S>,
    policy: NewsPolicy,
    today: Option<Date>,
}

impl<S: MarketDataSource + ?Sized> NewsAggregator<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_policy(source, NewsPolicy::default())
    }

    pub fn with_policy(source: Arc<S>, policy: NewsPolicy) -> Self {
        Self {
            source,
            policy,
            today: None,
        }
    }

    /// Pins the end of the company-news window instead of using the UTC date.
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    pub const fn policy(&self) -> &NewsPolicy {
        &self.policy
    }

    /// At most `max_articles` articles for `symbols`.
    pub async fn get_news(&self, symbols: &SymbolSet) -> Result<Vec<NewsArticle>, WatchError> {
        self.source.ensure_configured()?;

        if !symbols.is_empty() {
            let slate = self.company_slate(symbols).await;
            if !slate.is_empty() {
                return Ok(slate);
            }
            debug!(
                symbols = symbols.len(),
                "no company news selected; falling back to general news"
            );
        }

        self.general_slate().await
    }

    async fn company_slate(&self, symbols: &SymbolSet) -> Vec<NewsArticle> {
        let today = self
            .today
            .unwrap_or_else(|| OffsetDateTime::now_utc().date());
        let range = DateRange::trailing_days(today, self.policy.lookback_days);

        let feeds: Vec<Vec<RawNewsArticle>> =
            join_all(symbols.iter().map(|symbol| async move {
                let fetched = self.source.company_news(symbol, range).await;
                Branch::settle(symbol, fetched)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(RawNewsArticle::is_well_formed)
                    .collect::<Vec<_>>()
            }))
            .await;

        let ordered = symbols.as_slice();
        let mut slate: Vec<NewsArticle> = round_robin(&feeds, self.policy.max_articles)
            .into_iter()
            .map(|(index, raw)| {
                format_company_article(raw, &ordered[index], index, self.policy.company_summary_chars)
            })
            .collect();

        // Stable: equal timestamps keep round-robin order.
        slate.sort_by(|a, b| b.datetime.cmp(&a.datetime));
        slate
    }

    async fn general_slate(&self) -> Result<Vec<NewsArticle>, WatchError> {
        let feed = self.source.general_news().await?;
        let valid: Vec<RawNewsArticle> = feed
            .into_iter()
            .filter(RawNewsArticle::is_well_formed)
            .collect();

        Ok(dedup_general(&valid, self.policy.dedup_candidate_cap)
            .into_iter()
            .take(self.policy.max_articles)
            .map(|raw| format_general_article(raw, self.policy.general_summary_chars))
            .collect())
    }
}

/// Fair selection across per-symbol feeds.
///
/// Each round visits the feeds in order and takes at most one article from
/// each, skipping articles already selected from another feed. Returns
/// `(feed index, article)` pairs in selection order, at most `budget` long.
pub fn round_robin(feeds: &[Vec<RawNewsArticle>], budget: usize) -> Vec<(usize, &RawNewsArticle)> {
    let mut cursors = vec![0_usize; feeds.len()];
    let mut selected = Vec::with_capacity(budget);
    let mut seen = HashSet::new();

    for _round in 0..budget {
        let before = selected.len();

        for (index, feed) in feeds.iter().enumerate() {
            if selected.len() >= budget {
                return selected;
            }
            while let Some(article) = feed.get(cursors[index]) {
                cursors[index] += 1;
                if seen.insert(article.dedup_key()) {
                    selected.push((index, article));
                    break;
                }
            }
        }

        if selected.len() == before {
            break;
        }
    }

    selected
}

/// First-seen unique articles by (id, url, headline), at most `cap` of them.
pub fn dedup_general(articles: &[RawNewsArticle], cap: usize) -> Vec<&RawNewsArticle> {
    let mut seen = HashSet::new();
    articles
        .iter()
        .filter(|article| seen.insert(article.dedup_key()))
        .take(cap)
        .collect()
}

pub fn format_company_article(
    raw: &RawNewsArticle,
    symbol: &Symbol,
    symbol_index: usize,
    summary_chars: usize,
) -> NewsArticle {
    NewsArticle {
        related_symbol: Some(symbol.clone()),
        source_symbol_index: Some(symbol_index),
        ..format_article(raw, NewsCategory::Company, summary_chars)
    }
}

pub fn format_general_article(raw: &RawNewsArticle, summary_chars: usize) -> NewsArticle {
    NewsArticle {
        related_symbol: raw.related_symbols().into_iter().next(),
        ..format_article(raw, NewsCategory::General, summary_chars)
    }
}

fn format_article(raw: &RawNewsArticle, category: NewsCategory, summary_chars: usize) -> NewsArticle {
    let source = match raw.source.trim() {
        "" => match category {
            NewsCategory::Company => COMPANY_SOURCE,
            NewsCategory::General => GENERAL_SOURCE,
        },
        source => source,
    };

    NewsArticle {
        id: raw.id,
        headline: raw.headline.trim().to_owned(),
        summary: truncate_chars(raw.summary.trim(), summary_chars),
        source: source.to_owned(),
        url: raw.url.trim().to_owned(),
        datetime: raw.datetime,
        category,
        related_symbol: None,
        source_symbol_index: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64, datetime: i64) -> RawNewsArticle {
        RawNewsArticle {
            id,
            headline: format!("Headline {id}"),
            summary: format!("Summary {id}"),
            source: String::from("Wire"),
            url: format!("https://news.test/{id}"),
            datetime,
            related: String::new(),
        }
    }

    fn ids(selection: &[(usize, &RawNewsArticle)]) -> Vec<(usize, i64)> {
        selection.iter().map(|(index, a)| (*index, a.id)).collect()
    }

    #[test]
    fn round_robin_interleaves_until_budget() {
        let a: Vec<_> = (1..=10).map(|n| article(100 + n, n)).collect();
        let b = vec![article(201, 1)];
        let c = Vec::new();
        let feeds = vec![a, b, c];

        let selected = round_robin(&feeds, 6);

        assert_eq!(
            ids(&selected),
            vec![(0, 101), (1, 201), (0, 102), (0, 103), (0, 104), (0, 105)]
        );
    }

    #[test]
    fn round_robin_stops_when_feeds_are_exhausted() {
        let feeds = vec![vec![article(1, 1)], vec![article(2, 2)], Vec::new()];
        assert_eq!(round_robin(&feeds, 6).len(), 2);
        assert!(round_robin(&[Vec::new(), Vec::new()], 6).is_empty());
    }

    #[test]
    fn round_robin_skips_stories_shared_between_symbols() {
        let shared = article(9, 5);
        let feeds = vec![
            vec![shared.clone(), article(1, 4)],
            vec![shared, article(2, 3)],
        ];

        let selected = round_robin(&feeds, 6);

        assert_eq!(ids(&selected), vec![(0, 9), (1, 2), (0, 1)]);
    }

    #[test]
    fn dedup_keeps_first_seen_order_and_cap() {
        let feed = vec![article(1, 9), article(2, 8), article(1, 9), article(3, 7)];
        let unique: Vec<i64> = dedup_general(&feed, 20).iter().map(|a| a.id).collect();
        assert_eq!(unique, vec![1, 2, 3]);
        assert_eq!(dedup_general(&feed, 2).len(), 2);
    }

    #[test]
    fn formatting_trims_truncates_and_defaults_source() {
        let raw = RawNewsArticle {
            headline: String::from("  Spaced headline  "),
            summary: "x".repeat(210),
            source: String::from(" "),
            related: String::from("msft,AAPL"),
            ..article(5, 10)
        };

        let company = format_company_article(&raw, &Symbol::parse("AAPL").expect("valid"), 1, 200);
        assert_eq!(company.headline, "Spaced headline");
        assert_eq!(company.summary.chars().count(), 203);
        assert!(company.summary.ends_with("..."));
        assert_eq!(company.source, "Company News");
        assert_eq!(company.source_symbol_index, Some(1));

        let general = format_general_article(&raw, 150);
        assert_eq!(general.source, "Market News");
        assert_eq!(general.category, NewsCategory::General);
        assert_eq!(general.related_symbol.map(String::from).as_deref(), Some("MSFT"));
        assert_eq!(general.source_symbol_index, None);
    }

    #[test]
    fn short_summary_is_not_marked_truncated() {
        let formatted = format_general_article(&article(1, 1), 150);
        assert_eq!(formatted.summary, "Summary 1");
    }
}
