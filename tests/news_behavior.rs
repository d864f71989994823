//! Behavior-driven tests for the news slate
//!
//! These tests verify round-robin fairness across symbols, deduplication of
//! the general feed, and the fallback from company to general news.

use std::collections::HashSet;
use std::sync::Arc;

use time::macros::date;
use watchdesk_core::{NewsPolicy, RawNewsArticle};
use watchdesk_tests::{
    article, feed_json, finnhub, symbols, Endpoint, HttpError, HttpResponse, NewsAggregator,
    NewsCategory, ScriptedHttpClient, WatchError,
};

fn tagged(prefix: &str, count: i64, base_time: i64) -> Vec<RawNewsArticle> {
    (1..=count)
        .map(|n| article(n, &format!("{prefix}{n}"), base_time - n))
        .collect()
}

// =============================================================================
// Symbol Mode: Round-Robin Fairness
// =============================================================================

#[tokio::test]
async fn round_robin_draws_fairly_before_filling_from_abundant_symbols() {
    // Given: A has 10 articles, B has 1 and C has none
    let client = Arc::new(
        ScriptedHttpClient::new()
            .respond_json("/company-news", &[("symbol", "A")], &feed_json(&tagged("A", 10, 1_000)))
            .respond_json("/company-news", &[("symbol", "B")], &feed_json(&tagged("B", 1, 2_000)))
            .respond_json("/company-news", &[("symbol", "C")], "[]"),
    );
    let news = NewsAggregator::new(finnhub(client));

    // When: News is requested for A, B and C
    let slate = news.get_news(&symbols(&["A", "B", "C"])).await.expect("news");

    // Then: The slate holds A1, B1, A2..A5, newest first
    let mut headlines: Vec<&str> = slate.iter().map(|a| a.headline.as_str()).collect();
    assert_eq!(slate.len(), 6);
    assert_eq!(headlines[0], "B1 headline");
    headlines.sort_unstable();
    assert_eq!(
        headlines,
        vec![
            "A1 headline",
            "A2 headline",
            "A3 headline",
            "A4 headline",
            "A5 headline",
            "B1 headline",
        ]
    );
    assert!(slate.windows(2).all(|pair| pair[0].datetime >= pair[1].datetime));
    assert!(slate.iter().all(|a| a.category == NewsCategory::Company));
}

#[tokio::test]
async fn contributing_symbol_and_its_position_are_recorded() {
    // Given: Only the second watched symbol has news
    let client = Arc::new(ScriptedHttpClient::new().respond_json(
        "/company-news",
        &[("symbol", "MSFT")],
        &feed_json(&tagged("M", 2, 5_000)),
    ));
    let news = NewsAggregator::new(finnhub(client));

    // When: News is requested
    let slate = news.get_news(&symbols(&["AAPL", "MSFT"])).await.expect("news");

    // Then: Each article points back at MSFT and its index 1
    assert_eq!(slate.len(), 2);
    for article in &slate {
        assert_eq!(article.related_symbol.as_ref().map(|s| s.as_str()), Some("MSFT"));
        assert_eq!(article.source_symbol_index, Some(1));
    }
}

#[tokio::test]
async fn malformed_and_failed_feeds_are_silently_skipped() {
    // Given: A's feed fails, B's has one malformed and one valid article
    let mut malformed = article(1, "bad", 100);
    malformed.summary = String::from("  ");
    let valid = article(2, "good", 200);
    let client = Arc::new(
        ScriptedHttpClient::new()
            .respond("/company-news", &[("symbol", "A")], Err(HttpError::new("reset")))
            .respond_json("/company-news", &[("symbol", "B")], &feed_json(&[malformed, valid])),
    );
    let news = NewsAggregator::new(finnhub(client));

    // When: News is requested for both
    let slate = news.get_news(&symbols(&["A", "B"])).await.expect("news");

    // Then: Only the valid article survives
    assert_eq!(slate.len(), 1);
    assert_eq!(slate[0].headline, "good headline");
}

#[tokio::test]
async fn mistyped_company_article_does_not_cost_the_symbol_its_feed() {
    // Given: A's feed holds one valid article and one with a fractional timestamp
    let body = format!(
        r#"[{}, {{"id": 2, "headline": "odd", "summary": "s", "source": "src",
              "url": "https://news.test/odd", "datetime": 1700000000.5}}]"#,
        serde_json::to_string(&article(1, "a-valid", 1_700_000_000)).expect("serialize"),
    );
    let client = Arc::new(
        ScriptedHttpClient::new()
            .respond_json("/company-news", &[("symbol", "A")], &body)
            .respond_json("/news", &[], &feed_json(&[article(9, "general", 50)])),
    );
    let news = NewsAggregator::new(finnhub(client.clone()));

    // When: News is requested for A
    let slate = news.get_news(&symbols(&["A"])).await.expect("news");

    // Then: A's valid article is kept and no fallback happens
    assert_eq!(slate.len(), 1);
    assert_eq!(slate[0].headline, "a-valid headline");
    assert_eq!(slate[0].category, NewsCategory::Company);
    assert_eq!(client.calls_to("/news"), 0);
}

#[tokio::test]
async fn company_news_is_requested_over_the_lookback_window() {
    // Given: A pinned calendar date
    let client = Arc::new(
        ScriptedHttpClient::new()
            .respond_json("/company-news", &[], "[]")
            .respond_json("/news", &[], "[]"),
    );
    let news = NewsAggregator::new(finnhub(client.clone())).with_today(date!(2024 - 03 - 10));

    // When: News is requested for a watched symbol
    news.get_news(&symbols(&["AAPL"])).await.expect("news");

    // Then: The company feed covers the five days up to today
    let requests: Vec<_> = client
        .recorded_requests()
        .into_iter()
        .filter(|request| request.path == "/company-news")
        .collect();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_param("symbol"), Some("AAPL"));
    assert_eq!(requests[0].query_param("from"), Some("2024-03-05"));
    assert_eq!(requests[0].query_param("to"), Some("2024-03-10"));
}

// =============================================================================
// General Mode: Deduplication
// =============================================================================

#[tokio::test]
async fn general_feed_is_deduplicated_in_first_seen_order() {
    // Given: A 25-article feed containing three exact duplicate pairs
    let mut feed: Vec<RawNewsArticle> = (1..=22).map(|n| article(n, &format!("g{n}"), 10_000 - n)).collect();
    feed.insert(1, article(1, "g1", 9_999));
    feed.insert(4, article(3, "g3", 9_997));
    feed.insert(7, article(5, "g5", 9_995));
    assert_eq!(feed.len(), 25);

    let client = Arc::new(ScriptedHttpClient::new().respond_json(
        "/news",
        &[("category", "general")],
        &feed_json(&feed),
    ));
    let news = NewsAggregator::new(finnhub(client));

    // When: News is requested without symbols
    let slate = news.get_news(&symbols(&[])).await.expect("news");

    // Then: At most six unique articles in provider order
    assert!(slate.len() <= 6);
    let keys: HashSet<_> = slate.iter().map(|a| a.dedup_key()).collect();
    assert_eq!(keys.len(), slate.len());
    let ids: Vec<i64> = slate.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert!(slate.iter().all(|a| a.category == NewsCategory::General));
}

#[tokio::test]
async fn same_id_with_different_url_is_not_a_duplicate() {
    // Given: Two articles sharing an id but not a url
    let first = article(7, "one", 20);
    let second = RawNewsArticle {
        url: String::from("https://news.test/elsewhere"),
        ..first.clone()
    };
    let client = Arc::new(ScriptedHttpClient::new().respond_json("/news", &[], &feed_json(&[first, second])));
    let news = NewsAggregator::new(finnhub(client));

    // When: General news is requested
    let slate = news.get_news(&symbols(&[])).await.expect("news");

    // Then: Both are kept
    assert_eq!(slate.len(), 2);
}

#[tokio::test]
async fn mistyped_general_article_is_dropped_not_surfaced() {
    // Given: A general feed with two valid articles around one with a string id
    let valid = |id, tag: &str| serde_json::to_string(&article(id, tag, 1_000 - id)).expect("serialize");
    let body = format!(
        r#"[{}, {{"id": "x2", "headline": "bad", "summary": "s", "source": "src",
              "url": "https://news.test/bad", "datetime": 999}}, {}]"#,
        valid(1, "first"),
        valid(3, "third"),
    );
    let client = Arc::new(ScriptedHttpClient::new().respond_json("/news", &[], &body));
    let news = NewsAggregator::new(finnhub(client));

    // When: General news is requested
    let slate = news.get_news(&symbols(&[])).await.expect("news");

    // Then: Only the bad article is missing
    let ids: Vec<i64> = slate.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn dedup_cap_bounds_the_candidates() {
    // Given: A policy examining only three unique candidates
    let policy = NewsPolicy {
        dedup_candidate_cap: 3,
        ..NewsPolicy::default()
    };
    let client = Arc::new(ScriptedHttpClient::new().respond_json("/news", &[], &feed_json(&tagged("n", 10, 500))));
    let news = NewsAggregator::with_policy(finnhub(client), policy);

    // When: General news is requested
    let slate = news.get_news(&symbols(&[])).await.expect("news");

    // Then: The slate is limited by the cap
    assert_eq!(slate.len(), 3);
}

// =============================================================================
// Fallback and Failure
// =============================================================================

#[tokio::test]
async fn empty_company_coverage_falls_back_to_general_news() {
    // Given: X has no company news but the general feed has stories
    let client = Arc::new(
        ScriptedHttpClient::new()
            .respond_json("/company-news", &[], "[]")
            .respond_json("/news", &[("category", "general")], &feed_json(&tagged("g", 4, 900))),
    );
    let news = NewsAggregator::new(finnhub(client.clone()));

    // When: News is requested for X
    let slate = news.get_news(&symbols(&["X"])).await.expect("news");

    // Then: General news fills the slate instead of an empty list
    assert_eq!(slate.len(), 4);
    assert!(slate.iter().all(|a| a.category == NewsCategory::General));
    assert_eq!(client.calls_to("/company-news"), 1);
    assert_eq!(client.calls_to("/news"), 1);
}

#[tokio::test]
async fn general_feed_failure_is_surfaced() {
    // Given: The general feed is down
    let client = Arc::new(ScriptedHttpClient::new().respond(
        "/news",
        &[],
        Ok(HttpResponse::with_status(503, "maintenance")),
    ));
    let news = NewsAggregator::new(finnhub(client));

    // When: General news is requested
    let result = news.get_news(&symbols(&[])).await;

    // Then: The provider error reaches the caller
    match result {
        Err(WatchError::Provider(error)) => {
            assert_eq!(error.endpoint(), Endpoint::GeneralNews);
            assert_eq!(error.status(), Some(503));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}
