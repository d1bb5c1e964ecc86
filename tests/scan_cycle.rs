//! End-to-end scan cycle tests over deterministic in-memory doubles.
//!
//! Each test wires a real `Scanner` and `SnapshotStore` to the scripted
//! feed and recording notifier from `common`, runs whole cycles, and
//! asserts on what was published and what was delivered.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{dead_band_quote, neutral_quote, strong_quote, RecordingNotifier, ScriptedFeed};
use surge::config::ScannerConfig;
use surge::dashboard;
use surge::engine::scanner::Scanner;
use surge::store::SnapshotStore;
use surge::types::Instrument;

fn watchlist(names: &[&str]) -> Vec<Instrument> {
    names
        .iter()
        .map(|n| Instrument {
            name: n.to_string(),
            code: format!("CODE-{n}"),
        })
        .collect()
}

fn config(reset_probability: f64) -> ScannerConfig {
    ScannerConfig {
        interval_secs: 30,
        alert_threshold: 75,
        clear_threshold: 60,
        reset_probability,
    }
}

/// Give fire-and-forget dispatch tasks a moment to run.
async fn drain_dispatch() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn end_to_end_one_strong_one_no_data() {
    let feed = Arc::new(ScriptedFeed::new());
    feed.set_quote("CODE-alpha", strong_quote());
    // beta: never installed — NoData every cycle

    let notifier = Arc::new(RecordingNotifier::new());
    let store = SnapshotStore::new();
    let mut scanner = Scanner::new(
        watchlist(&["alpha", "beta"]),
        feed.clone(),
        Some(notifier.clone()),
        store.clone(),
        &config(0.0),
    );

    let report = scanner.run_cycle().await;
    drain_dispatch().await;

    assert_eq!(report.scanned, 2);
    assert_eq!(report.no_data, 1);
    assert_eq!(report.published, 1);
    assert_eq!(report.alerts_sent, 1);

    let snap = store.read().await;
    assert_eq!(snap.stocks.len(), 1);
    assert_eq!(snap.stocks[0].name, "alpha");
    assert_eq!(snap.stocks[0].score, 80);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("alpha"));
    assert!(sent[0].contains("80/100"));
}

#[tokio::test]
async fn repeated_high_scores_notify_exactly_once() {
    let feed = Arc::new(ScriptedFeed::new());
    feed.set_quote("CODE-alpha", strong_quote());

    let notifier = Arc::new(RecordingNotifier::new());
    let mut scanner = Scanner::new(
        watchlist(&["alpha"]),
        feed.clone(),
        Some(notifier.clone()),
        SnapshotStore::new(),
        &config(0.0),
    );

    for _ in 0..5 {
        scanner.run_cycle().await;
    }
    drain_dispatch().await;

    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn hysteresis_rearms_only_below_clear_threshold() {
    let feed = Arc::new(ScriptedFeed::new());
    feed.set_quote("CODE-alpha", strong_quote());

    let notifier = Arc::new(RecordingNotifier::new());
    let store = SnapshotStore::new();
    let mut scanner = Scanner::new(
        watchlist(&["alpha"]),
        feed.clone(),
        Some(notifier.clone()),
        store.clone(),
        &config(0.0),
    );

    // cycle 1: alert fires
    scanner.run_cycle().await;

    // cycles in the dead band (score 70): suppressed, unpublished,
    // but still armed
    feed.set_quote("CODE-alpha", dead_band_quote());
    scanner.run_cycle().await;
    assert!(store.read().await.stocks.is_empty());

    // back above threshold without ever dropping below 60: still silent
    feed.set_quote("CODE-alpha", strong_quote());
    scanner.run_cycle().await;
    drain_dispatch().await;
    assert_eq!(notifier.sent().len(), 1);

    // drop below the clear threshold, then recover: second alert
    feed.set_quote("CODE-alpha", neutral_quote());
    scanner.run_cycle().await;
    feed.set_quote("CODE-alpha", strong_quote());
    scanner.run_cycle().await;
    drain_dispatch().await;
    assert_eq!(notifier.sent().len(), 2);
}

#[tokio::test]
async fn stochastic_reset_renotifies_persistent_signal() {
    let feed = Arc::new(ScriptedFeed::new());
    feed.set_quote("CODE-alpha", strong_quote());

    let notifier = Arc::new(RecordingNotifier::new());
    // probability 1.0 resets the book every cycle
    let mut scanner = Scanner::new(
        watchlist(&["alpha"]),
        feed.clone(),
        Some(notifier.clone()),
        SnapshotStore::new(),
        &config(1.0),
    );

    for _ in 0..3 {
        let report = scanner.run_cycle().await;
        assert!(report.reset);
    }
    drain_dispatch().await;

    assert_eq!(notifier.sent().len(), 3);
}

#[tokio::test]
async fn fetch_failure_is_isolated_per_instrument() {
    let feed = Arc::new(ScriptedFeed::new());
    feed.set_quote("CODE-alpha", strong_quote());
    feed.set_quote("CODE-beta", strong_quote());
    feed.set_quote("CODE-gamma", strong_quote());

    let notifier = Arc::new(RecordingNotifier::new());
    let store = SnapshotStore::new();
    let mut scanner = Scanner::new(
        watchlist(&["alpha", "beta", "gamma"]),
        feed.clone(),
        Some(notifier.clone()),
        store.clone(),
        &config(0.0),
    );

    // beta's feed goes dark before the first cycle
    feed.clear_quote("CODE-beta");
    let report = scanner.run_cycle().await;
    drain_dispatch().await;

    assert_eq!(report.no_data, 1);
    assert_eq!(report.published, 2);
    assert_eq!(report.alerts_sent, 2);

    let names: Vec<_> = store
        .read()
        .await
        .stocks
        .iter()
        .map(|s| s.name.clone())
        .collect();
    assert_eq!(names, vec!["alpha", "gamma"]);

    // beta recovers next cycle and alerts as usual — its earlier NoData
    // left its alert state untouched
    feed.set_quote("CODE-beta", strong_quote());
    let report = scanner.run_cycle().await;
    drain_dispatch().await;
    assert_eq!(report.alerts_sent, 1);
    assert_eq!(notifier.sent().len(), 3);
}

#[tokio::test]
async fn delivery_failure_never_blocks_or_retries() {
    let feed = Arc::new(ScriptedFeed::new());
    feed.set_quote("CODE-alpha", strong_quote());

    let notifier = Arc::new(RecordingNotifier::new());
    notifier.set_failing(true);

    let store = SnapshotStore::new();
    let mut scanner = Scanner::new(
        watchlist(&["alpha"]),
        feed.clone(),
        Some(notifier.clone()),
        store.clone(),
        &config(0.0),
    );

    let report = scanner.run_cycle().await;
    drain_dispatch().await;

    // the cycle dispatched and published; delivery itself failed and is
    // dropped — no retry on later cycles either
    assert_eq!(report.alerts_sent, 1);
    assert_eq!(report.published, 1);
    assert!(notifier.sent().is_empty());

    notifier.set_failing(false);
    scanner.run_cycle().await;
    drain_dispatch().await;
    assert!(notifier.sent().is_empty()); // still suppressed, no resend
}

#[tokio::test]
async fn dashboard_serves_latest_published_snapshot() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    let feed = Arc::new(ScriptedFeed::new());
    feed.set_quote("CODE-alpha", strong_quote());

    let store = SnapshotStore::new();
    let mut scanner = Scanner::new(
        watchlist(&["alpha"]),
        feed.clone(),
        None,
        store.clone(),
        &config(0.0),
    );

    let app = dashboard::build_router(store.clone());

    // before the first cycle: empty list, not an error
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/api/stocks").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["stocks"].as_array().unwrap().is_empty());

    scanner.run_cycle().await;

    let resp = app
        .oneshot(Request::builder().uri("/api/stocks").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["stocks"][0]["name"], "alpha");
    assert_eq!(json["stocks"][0]["score"], 80);
    assert!(json["stocks"][0]["factors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "buy power very strong"));
}
