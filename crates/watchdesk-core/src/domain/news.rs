use serde::{Deserialize, Deserializer, Serialize};

use crate::Symbol;

/// News article as returned by a provider, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNewsArticle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headline: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Publication time in epoch seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub datetime: i64,
    /// Comma-separated related symbols.
    #[serde(default, deserialize_with = "null_as_default")]
    pub related: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawNewsArticle {
    /// An article is well-formed when headline, summary and url are non-blank
    /// and its timestamp is positive.
    pub fn is_well_formed(&self) -> bool {
        !self.headline.trim().is_empty()
            && !self.summary.trim().is_empty()
            && !self.url.trim().is_empty()
            && self.datetime > 0
    }

    pub fn related_symbols(&self) -> Vec<Symbol> {
        self.related
            .split(',')
            .filter_map(|raw| Symbol::parse(raw).ok())
            .collect()
    }

    pub fn dedup_key(&self) -> ArticleKey {
        ArticleKey::new(self.id, &self.url, &self.headline)
    }
}

/// Identity of an article for deduplication: two articles are duplicates iff
/// id, url and headline all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleKey {
    id: i64,
    url: String,
    headline: String,
}

impl ArticleKey {
    pub fn new(id: i64, url: &str, headline: &str) -> Self {
        Self {
            id,
            url: url.to_owned(),
            headline: headline.to_owned(),
        }
    }
}

/// Where an article in a slate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    Company,
    General,
}

/// Validated, display-ready article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: i64,
    pub headline: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub datetime: i64,
    pub category: NewsCategory,
    pub related_symbol: Option<Symbol>,
    /// Position of the contributing symbol in the caller's symbol order.
    pub source_symbol_index: Option<usize>,
}

impl NewsArticle {
    pub fn dedup_key(&self) -> ArticleKey {
        ArticleKey::new(self.id, &self.url, &self.headline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> RawNewsArticle {
        RawNewsArticle {
            id: 7,
            headline: String::from("Chipmaker beats estimates"),
            summary: String::from("Revenue rose."),
            source: String::from("Wire"),
            url: String::from("https://news.test/7"),
            datetime: 1_700_000_000,
            related: String::from("NVDA, amd,,$BAD"),
        }
    }

    #[test]
    fn well_formed_requires_text_fields_and_positive_timestamp() {
        assert!(article().is_well_formed());

        let blank_summary = RawNewsArticle {
            summary: String::from("   "),
            ..article()
        };
        assert!(!blank_summary.is_well_formed());

        let zero_time = RawNewsArticle {
            datetime: 0,
            ..article()
        };
        assert!(!zero_time.is_well_formed());
    }

    #[test]
    fn related_symbols_skip_unparseable_entries() {
        let related: Vec<String> = article()
            .related_symbols()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(related, vec!["NVDA", "AMD"]);
    }

    #[test]
    fn dedup_key_requires_all_three_fields() {
        let base = article();
        let other_url = RawNewsArticle {
            url: String::from("https://news.test/other"),
            ..article()
        };
        assert_eq!(base.dedup_key(), article().dedup_key());
        assert_ne!(base.dedup_key(), other_url.dedup_key());
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let raw: RawNewsArticle =
            serde_json::from_str(r#"{"id": 3, "headline": "Only a headline"}"#).expect("parse");
        assert_eq!(raw.id, 3);
        assert!(!raw.is_well_formed());
    }

    #[test]
    fn null_fields_deserialize_to_defaults() {
        let raw: RawNewsArticle =
            serde_json::from_str(r#"{"id": 4, "related": null, "source": null}"#).expect("parse");
        assert!(raw.related.is_empty());
        assert!(raw.source.is_empty());
    }
}
