//! Batch driver runs against in-memory and file-backed stores

use async_trait::async_trait;
use gamelens_aspects::{
    AspectDetector, AspectLexicon, Classification, Classifier, SentimentAttributor,
};
use gamelens_batch::{
    BatchConfig, BatchDriver, DocumentStore, DriverOptions, JsonFileStore, MemoryStore,
    UpdateOutcome,
};
use gamelens_core::{Error, Result, Review, Sentiment};
use gamelens_telemetry::render_report;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// "awful" is strongly negative, "great" positive, anything else faintly positive
struct KeywordClassifier;

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let result = if text.contains("awful") {
            Classification::new(Sentiment::Negative, 0.9)
        } else if text.contains("great") {
            Classification::new(Sentiment::Positive, 0.8)
        } else {
            Classification::new(Sentiment::Positive, 0.1)
        };
        Ok(result)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Wraps a store and injects write or fetch failures
struct FlakyStore {
    inner: MemoryStore,
    fail_update_for: Option<String>,
    fail_find_from: Option<usize>,
    fail_flush: bool,
    updates: AtomicU32,
    flushes: AtomicU32,
}

impl FlakyStore {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_update_for: None,
            fail_find_from: None,
            fail_flush: false,
            updates: AtomicU32::new(0),
            flushes: AtomicU32::new(0),
        }
    }

    fn failing_update(mut self, id: &str) -> Self {
        self.fail_update_for = Some(id.to_string());
        self
    }

    fn failing_find_from(mut self, skip: usize) -> Self {
        self.fail_find_from = Some(skip);
        self
    }

    fn failing_flush(mut self) -> Self {
        self.fail_flush = true;
        self
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn find(&self, skip: usize, limit: usize) -> Result<Vec<Review>> {
        if self.fail_find_from.is_some_and(|from| skip >= from) {
            return Err(Error::store("Simulated connection reset"));
        }
        self.inner.find(skip, limit).await
    }

    async fn update_field(&self, id: &str, field: &str, value: Value) -> Result<UpdateOutcome> {
        self.updates.fetch_add(1, Ordering::Relaxed);
        if self.fail_update_for.as_deref() == Some(id) {
            return Err(Error::store("Simulated write conflict"));
        }
        self.inner.update_field(id, field, value).await
    }

    async fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        if self.fail_flush {
            return Err(Error::store("Simulated disk full"));
        }
        self.inner.flush().await
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

fn reviews() -> Vec<Value> {
    vec![
        json!({"_id": "a", "review": "Great graphics.", "platform": "steam"}),
        json!({"_id": "b", "review": "The price is awful.", "platform": "steam"}),
        json!({"_id": "c", "review": "Bought it for my brother."}),
        json!({"_id": "d", "review": "Great story but awful lag.", "platform": "reddit"}),
    ]
}

fn driver(store: Arc<dyn DocumentStore>, page_size: usize) -> BatchDriver {
    let lexicon = Arc::new(AspectLexicon::builtin().unwrap());
    BatchDriver::new(
        store,
        AspectDetector::new(lexicon),
        SentimentAttributor::new(Arc::new(KeywordClassifier)),
    )
    .with_options(DriverOptions {
        page_size,
        ..Default::default()
    })
}

#[tokio::test]
async fn test_full_run_persists_and_aggregates() {
    let store = Arc::new(MemoryStore::new(reviews()).unwrap());
    let summary = driver(store.clone(), 500).run().await;

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.seen, 4);
    assert_eq!(summary.persisted, 4);
    assert_eq!(summary.unchanged, 0);
    assert!(summary.is_clean());

    assert_eq!(
        store.get("a").unwrap()["aspect_sentiments"],
        json!({"visuals": "POSITIVE"})
    );
    assert_eq!(
        store.get("d").unwrap()["aspect_sentiments"],
        json!({"narrative": "NEGATIVE", "performance": "NEGATIVE"})
    );
    // A review without aspects still gets an (empty) result
    assert_eq!(store.get("c").unwrap()["aspect_sentiments"], json!({}));

    let stats = &summary.statistics;
    assert_eq!(stats.total_reviews, 4);
    assert_eq!(stats.platform_counts["steam"], 2);
    assert_eq!(stats.platform_counts["Unknown"], 1);
    assert_eq!(stats.overall_sentiment_counts.positive, 1);
    assert_eq!(stats.overall_sentiment_counts.negative, 3);
    assert!(stats.is_consistent());
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let store = Arc::new(MemoryStore::new(reviews()).unwrap());
    let driver = driver(store.clone(), 3);

    let first = driver.run().await;
    let snapshot = store.get("d").unwrap();
    let second = driver.run().await;

    assert_eq!(second.persisted, 4);
    assert_eq!(second.unchanged, 4);
    assert_eq!(store.get("d").unwrap(), snapshot);
    // Each run starts from fresh statistics
    assert_eq!(first.statistics, second.statistics);
}

#[tokio::test]
async fn test_persist_failure_skips_aggregation() {
    let store = Arc::new(FlakyStore::new(MemoryStore::new(reviews()).unwrap()).failing_update("b"));
    let summary = driver(store.clone(), 500).run().await;

    assert_eq!(summary.seen, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.persisted, 3);
    assert!(!summary.is_clean());
    assert_eq!(store.updates.load(Ordering::Relaxed), 4);

    let stats = &summary.statistics;
    assert_eq!(stats.total_reviews, 3);
    assert!(!stats.aspect_mention_counts.contains_key("value"));
    assert_eq!(stats.platform_counts["steam"], 1);
    assert!(store.inner.get("b").unwrap().get("aspect_sentiments").is_none());
}

#[tokio::test]
async fn test_pagination_covers_every_document() {
    let docs: Vec<Value> = (0..5)
        .map(|i| json!({"_id": format!("r{i}"), "review": "Great soundtrack."}))
        .collect();
    let store = Arc::new(MemoryStore::new(docs).unwrap());

    let summary = driver(store.clone(), 2).run().await;

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.seen, 5);
    assert_eq!(summary.statistics.aspect_mention_counts["audio"], 5);
    for i in 0..5 {
        let id = format!("r{i}");
        assert_eq!(
            store.get(&id).unwrap()["aspect_sentiments"],
            json!({"audio": "POSITIVE"})
        );
    }
}

#[tokio::test]
async fn test_fetch_error_ends_run_with_partial_statistics() {
    let store = Arc::new(FlakyStore::new(MemoryStore::new(reviews()).unwrap()).failing_find_from(2));
    let summary = driver(store, 2).run().await;

    assert!(summary.fetch_error);
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.seen, 2);
    assert_eq!(summary.statistics.total_reviews, 2);
    assert!(render_report(&summary.statistics).contains("Total Reviews Processed: 2"));
}

#[tokio::test]
async fn test_empty_store() {
    let store = Arc::new(MemoryStore::new(Vec::new()).unwrap());
    let summary = driver(store, 500).run().await;

    assert_eq!(summary.pages, 0);
    assert_eq!(summary.seen, 0);
    assert!(summary.is_clean());
    assert!(render_report(&summary.statistics).contains("Positive Reviews: 0.00%"));
}

#[tokio::test]
async fn test_from_config_over_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    std::fs::write(
        &path,
        serde_json::to_string(&json!([
            {"_id": "1", "review": "The soundtrack is amazing.", "platform": "steam", "game_title": "Hollow"},
            {"_id": "2", "review": "Terrible lag and a broken frame rate.", "platform": "reddit"}
        ]))
        .unwrap(),
    )
    .unwrap();

    let config = BatchConfig {
        store_path: Some(path.clone()),
        result_field: "aspects".to_string(),
        ..Default::default()
    };
    let driver = BatchDriver::from_config(&config).unwrap();
    let summary = driver.run().await;
    assert_eq!(summary.persisted, 2);

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.len(), 2);
    let on_disk: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[0]["aspects"], json!({"audio": "POSITIVE"}));
    assert_eq!(on_disk[1]["aspects"], json!({"performance": "NEGATIVE"}));
    assert_eq!(on_disk[0]["game_title"], json!("Hollow"));
}

#[test]
fn test_from_config_rejects_missing_store() {
    let config = BatchConfig {
        store_path: Some(PathBuf::from("/nonexistent/reviews.json")),
        ..Default::default()
    };
    assert!(matches!(BatchDriver::from_config(&config), Err(Error::Store(_))));

    let err = BatchDriver::from_config(&BatchConfig::default()).err().unwrap();
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_stunning_graphics_high_price_is_written_back() {
    let store = Arc::new(
        MemoryStore::new(vec![json!({
            "_id": "r1",
            "review": "The graphics are stunning but the price is too high",
            "platform": "steam"
        })])
        .unwrap(),
    );

    let summary = driver(store.clone(), 500).run().await;
    assert_eq!(summary.persisted, 1);

    // The single sentence is evidence for both aspects, so they share a label
    let doc = store.get("r1").unwrap();
    assert_eq!(
        doc["aspect_sentiments"],
        json!({"value": "POSITIVE", "visuals": "POSITIVE"})
    );
    assert_eq!(doc["review"], json!("The graphics are stunning but the price is too high"));
    assert_eq!(summary.statistics.aspect_mention_counts.len(), 2);
}

#[tokio::test]
async fn test_documents_without_usable_ids_are_processed() {
    let store = Arc::new(
        MemoryStore::new(vec![
            json!({"_id": "1", "review": "Great graphics."}),
            json!({"review": "The price is awful."}),
            json!({"_id": true, "review": "Great soundtrack."}),
        ])
        .unwrap(),
    );

    let summary = driver(store.clone(), 500).run().await;

    assert!(summary.is_clean());
    assert_eq!(summary.persisted, 3);
    assert_eq!(store.get("1").unwrap()["aspect_sentiments"], json!({"visuals": "POSITIVE"}));
    assert_eq!(store.get("#1").unwrap()["aspect_sentiments"], json!({"value": "NEGATIVE"}));
    assert_eq!(store.get("#2").unwrap()["aspect_sentiments"], json!({"audio": "POSITIVE"}));
}

#[tokio::test]
async fn test_store_is_flushed_once_per_run() {
    let store = Arc::new(FlakyStore::new(MemoryStore::new(reviews()).unwrap()));
    let summary = driver(store.clone(), 2).run().await;

    assert!(summary.is_clean());
    assert_eq!(store.flushes.load(Ordering::Relaxed), 1);

    let failing = Arc::new(FlakyStore::new(MemoryStore::new(reviews()).unwrap()).failing_flush());
    let summary = driver(failing, 2).run().await;

    assert!(summary.flush_error);
    assert!(!summary.is_clean());
    // Writes were acknowledged before the flush, so they still count
    assert_eq!(summary.statistics.total_reviews, 4);
}

#[tokio::test]
async fn test_json_file_run_leaves_no_journal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    std::fs::write(&path, serde_json::to_string(&reviews()).unwrap()).unwrap();

    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    let summary = driver(store.clone(), 2).run().await;

    assert!(summary.is_clean());
    assert_eq!(store.pending(), 0);
    assert!(!store.journal_path().exists());

    let on_disk: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[1]["aspect_sentiments"], json!({"value": "NEGATIVE"}));
}

#[test]
fn test_run_counters_reach_the_recorder() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

    let store = Arc::new(FlakyStore::new(MemoryStore::new(reviews()).unwrap()).failing_update("b"));
    let driver = driver(store, 500);
    let summary = metrics::with_local_recorder(&recorder, || runtime.block_on(driver.run()));
    assert_eq!(summary.failed, 1);

    let rendered = handle.render();
    assert!(rendered.contains("gamelens_pages_fetched_total 1"));
    assert!(rendered.contains("gamelens_reviews_processed_total 4"));
    assert!(rendered.contains("gamelens_persist_failures_total 1"));
    assert!(rendered.contains("gamelens_reviews_recorded_total 3"));
    assert!(rendered.contains(r#"gamelens_aspect_mentions_total{aspect="visuals"} 1"#));
}
