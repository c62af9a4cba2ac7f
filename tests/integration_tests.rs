//! Integration tests over the public API
//!
//! Tests the full flow: seeded store → paginator → cursor strings → HTTP

use bucketed_feed::cli::router;
use bucketed_feed::cursor::{build_initial_window, encode};
use bucketed_feed::{
    BucketedFeedPaginator, CalendarPolicy, FeedConfig, FeedItem, FeedPage, InMemoryFeedStore,
    PaginatorConfig,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::TryStreamExt;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap()
}

/// `per_day[d]` items on the day `d` days before `now`, spaced one hour apart
fn seeded_items(now: DateTime<Utc>, per_day: &[usize]) -> Vec<FeedItem> {
    let today = now.date_naive().and_hms_opt(12, 0, 0).unwrap().and_utc();
    per_day
        .iter()
        .enumerate()
        .flat_map(|(days_ago, &count)| {
            let day = today - Duration::days(days_ago as i64);
            (0..count).map(move |n| {
                FeedItem::new(format!("d{days_ago}-{n}"), day - Duration::hours(n as i64))
                    .with_field("days_ago", days_ago)
            })
        })
        .collect()
}

fn paginator_over(items: Vec<FeedItem>, window_days: usize) -> BucketedFeedPaginator {
    let store = InMemoryFeedStore::from_items(items, CalendarPolicy::Utc);
    BucketedFeedPaginator::new(Arc::new(store))
        .with_config(PaginatorConfig::new().with_window_days(window_days))
}

async fn walk_at(
    paginator: &BucketedFeedPaginator,
    page_size: usize,
    now: DateTime<Utc>,
) -> Vec<FeedPage> {
    let mut pages = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = paginator
            .get_page_at(cursor.as_deref(), page_size, now)
            .await
            .unwrap();
        cursor = page.next_cursor.clone();
        pages.push(page);
        if cursor.is_none() {
            break;
        }
        assert!(pages.len() < 100, "traversal did not terminate");
    }
    pages
}

// ============================================================================
// Traversal Tests
// ============================================================================

#[tokio::test]
async fn test_traversal_is_newest_first_and_complete() {
    let now = fixed_now();
    // Day 8 falls outside an 8-day window
    let items = seeded_items(now, &[3, 0, 4, 1, 0, 0, 2, 5, 7]);
    let paginator = paginator_over(items, 8);

    let pages = walk_at(&paginator, 4, now).await;
    let all: Vec<&FeedItem> = pages.iter().flat_map(|p| &p.items).collect();

    assert_eq!(all.len(), 3 + 4 + 1 + 2 + 5);
    assert!(all.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    assert!(all.iter().all(|item| !item.id.starts_with("d8-")));

    let unique: HashSet<&str> = all.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(unique.len(), all.len());

    // Every page but the last is full
    let (last, rest) = pages.split_last().unwrap();
    assert!(rest.iter().all(|p| p.len() == 4));
    assert!(last.is_last());
}

#[tokio::test]
async fn test_pages_stream_matches_manual_walk() {
    let now = fixed_now();
    let paginator = paginator_over(seeded_items(now, &[2, 5, 0, 3]), 4);

    let manual = walk_at(&paginator, 3, now).await;
    let streamed: Vec<FeedPage> = paginator.pages(3, now).try_collect().await.unwrap();

    assert_eq!(streamed, manual);
}

#[tokio::test]
async fn test_cursor_pins_window_across_midnight() {
    let now = fixed_now();
    let paginator = paginator_over(seeded_items(now, &[2, 2, 2]), 3);

    let first = paginator.get_page_at(None, 3, now).await.unwrap();
    let cursor = first.next_cursor.clone().unwrap();

    // A day later the cursor still reads the original window
    let later = now + Duration::days(1);
    let second = paginator
        .get_page_at(Some(cursor.as_str()), 3, later)
        .await
        .unwrap();

    let ids: Vec<&str> = first
        .items
        .iter()
        .chain(&second.items)
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(ids, ["d0-0", "d0-1", "d1-0", "d1-1", "d2-0", "d2-1"]);
    assert!(second.is_last());
}

#[tokio::test]
async fn test_cursor_is_reusable() {
    let now = fixed_now();
    let paginator = paginator_over(seeded_items(now, &[5, 5]), 2);

    let first = paginator.get_page_at(None, 3, now).await.unwrap();
    let cursor = first.next_cursor.unwrap();

    let again = paginator.get_page_at(Some(cursor.as_str()), 3, now).await.unwrap();
    let once_more = paginator.get_page_at(Some(cursor.as_str()), 3, now).await.unwrap();
    assert_eq!(again, once_more);
}

#[tokio::test]
async fn test_config_driven_paginator_with_seed_file() {
    let now = Utc::now();
    let dir = tempfile::tempdir().unwrap();
    let seed_path = dir.path().join("feed.json");
    std::fs::write(
        &seed_path,
        serde_json::to_string(&seeded_items(now, &[2, 1, 3])).unwrap(),
    )
    .unwrap();

    let yaml = format!(
        "window_days: 3\ndefault_page_size: 4\nstore:\n  type: memory\n  seed: {}\n",
        seed_path.display()
    );
    let config = FeedConfig::from_yaml_str(&yaml).unwrap();
    let paginator = config.build_paginator().unwrap();

    let page_size = config.page_size(None).unwrap();
    let pages = walk_at(&paginator, page_size, now).await;
    let sizes: Vec<usize> = pages.iter().map(FeedPage::len).collect();
    assert_eq!(sizes, [4, 2]);
}

// ============================================================================
// HTTP Tests
// ============================================================================

async fn spawn_server(paginator: BucketedFeedPaginator, config: FeedConfig) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(paginator, config))
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

async fn get_json(client: &reqwest::Client, url: &str, query: &[(&str, &str)]) -> (u16, Value) {
    let response = client.get(url).query(query).send().await.unwrap();
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap();
    (status, body)
}

fn live_paginator(per_day: &[usize]) -> (BucketedFeedPaginator, FeedConfig) {
    let config = FeedConfig {
        window_days: 4,
        default_page_size: 3,
        max_page_size: 10,
        ..FeedConfig::default()
    };
    let paginator = paginator_over(seeded_items(Utc::now(), per_day), config.window_days);
    (paginator, config)
}

#[tokio::test]
async fn test_http_health() {
    let (paginator, config) = live_paginator(&[]);
    let base = spawn_server(paginator, config).await;

    let (status, body) = get_json(&reqwest::Client::new(), &format!("{base}/health"), &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_http_walks_feed_with_cursors() {
    let (paginator, config) = live_paginator(&[2, 0, 4, 1]);
    let base = spawn_server(paginator, config).await;
    let client = reqwest::Client::new();
    let url = format!("{base}/feed");

    let mut ids = Vec::new();
    let mut cursor: Option<String> = None;
    for _ in 0..10 {
        let mut query = vec![("page_size", "3")];
        if let Some(c) = cursor.as_deref() {
            query.push(("cursor", c));
        }
        let (status, body) = get_json(&client, &url, &query).await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);

        let data = &body["data"];
        for item in data["items"].as_array().unwrap() {
            ids.push(item["id"].as_str().unwrap().to_string());
        }
        cursor = data["next_cursor"].as_str().map(String::from);
        if cursor.is_none() {
            break;
        }
    }

    assert!(cursor.is_none());
    assert_eq!(
        ids,
        ["d0-0", "d0-1", "d2-0", "d2-1", "d2-2", "d2-3", "d3-0"]
    );
}

#[tokio::test]
async fn test_http_uses_default_page_size() {
    let (paginator, config) = live_paginator(&[5]);
    let base = spawn_server(paginator, config).await;

    let (status, body) = get_json(&reqwest::Client::new(), &format!("{base}/feed"), &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 3);
    assert!(body["data"]["next_cursor"].is_string());
}

#[tokio::test]
async fn test_http_rejects_bad_page_size() {
    let (paginator, config) = live_paginator(&[1]);
    let base = spawn_server(paginator, config).await;
    let client = reqwest::Client::new();
    let url = format!("{base}/feed");

    for size in ["0", "11"] {
        let (status, body) = get_json(&client, &url, &[("page_size", size)]).await;
        assert_eq!(status, 400, "page_size={size}");
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("page_size"));
    }
}

#[tokio::test]
async fn test_http_non_numeric_page_size_uses_envelope() {
    let (paginator, config) = live_paginator(&[1]);
    let base = spawn_server(paginator, config).await;

    let (status, body) = get_json(
        &reqwest::Client::new(),
        &format!("{base}/feed"),
        &[("page_size", "abc")],
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("page_size"));
}

#[tokio::test]
async fn test_http_malformed_cursor_starts_fresh() {
    let (paginator, config) = live_paginator(&[2]);
    let base = spawn_server(paginator, config).await;

    let (status, body) = get_json(
        &reqwest::Client::new(),
        &format!("{base}/feed"),
        &[("cursor", "not-a-cursor")],
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["items"][0]["id"], "d0-0");
}

#[tokio::test]
async fn test_http_invalid_store_token_is_client_error() {
    let (paginator, config) = live_paginator(&[2]);
    let forged = build_initial_window(Utc::now(), config.window_days, config.calendar)
        .resumed_at("bm90LWEtdG9rZW4");
    let cursor = encode(&forged);
    let base = spawn_server(paginator, config).await;

    let (status, body) = get_json(
        &reqwest::Client::new(),
        &format!("{base}/feed"),
        &[("cursor", cursor.as_str())],
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}
