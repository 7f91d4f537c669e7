use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use road_sentiment::app::ports::{ChatModel, EntityKind, EntityRecognizer, NamedEntity};
use road_sentiment::domain::{IssueType, LocationOutcome, RawRecord, RecordKind, Sentiment};
use road_sentiment::infra::csv_store;
use road_sentiment::pipeline::classify::IssueSentimentClassifier;
use road_sentiment::pipeline::enrich::EnrichmentOrchestrator;
use road_sentiment::pipeline::extract::LocationExtractor;
use road_sentiment::pipeline::filter::filter_records;
use road_sentiment::pipeline::summary::summarize;

const OUTAGE_MARKER: &str = "total outage";

struct ScriptedClassifier;

#[async_trait]
impl ChatModel for ScriptedClassifier {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, String> {
        if user.contains(OUTAGE_MARKER) {
            return Err("service unavailable".to_string());
        }
        if user.contains("crash") {
            Ok(r#"{"issue_type": "accident", "sentiment": "neutral"}"#.to_string())
        } else {
            Ok(r#"{"issue_type": "pothole", "sentiment": "angry"}"#.to_string())
        }
    }
}

struct ScriptedExtractor {
    calls: AtomicUsize,
}

#[async_trait]
impl ChatModel for ScriptedExtractor {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if user.contains(OUTAGE_MARKER) {
            return Err("service unavailable".to_string());
        }
        Ok("\"Redwood Road\"".to_string())
    }
}

struct GridRecognizer;

impl EntityRecognizer for GridRecognizer {
    fn entities(&self, text: &str) -> Vec<NamedEntity> {
        if text.contains("3300 South") {
            vec![NamedEntity {
                text: "3300 South".to_string(),
                kind: EntityKind::Location,
            }]
        } else {
            Vec::new()
        }
    }
}

fn record(id: &str, title: &str, body: &str, score: Option<i64>) -> RawRecord {
    RawRecord {
        subreddit: "SaltLakeCity".to_string(),
        kind: RecordKind::Post,
        title: title.to_string(),
        body: body.to_string(),
        url: "https://example.com/post".to_string(),
        score,
        created_utc: Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
        id: id.to_string(),
    }
}

#[tokio::test]
async fn filter_enrich_summarize_end_to_end() {
    let records = vec![
        record(
            "local",
            "Pothole on 3300 South",
            "massive pothole in the right lane near the light",
            Some(10),
        ),
        record(
            "remote",
            "Another crash this morning",
            "saw a bad crash on my commute, traffic backed up for miles",
            Some(5),
        ),
        record(
            "failing",
            "Anyone else stuck?",
            "total outage of my patience with these roads honestly",
            Some(3),
        ),
        record("too-short", "short", "tiny", Some(50)),
        record(
            "too-low",
            "Long enough but unloved",
            "this body is plenty long but nobody upvoted it at all",
            Some(0),
        ),
    ];

    let filtered = filter_records(records, 30, 2);
    let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["local", "remote", "failing"]);

    let extract_model = Arc::new(ScriptedExtractor {
        calls: AtomicUsize::new(0),
    });
    let classifier = Arc::new(IssueSentimentClassifier::new(Arc::new(ScriptedClassifier)));
    let extractor = Arc::new(LocationExtractor::new(
        Arc::new(GridRecognizer),
        extract_model.clone(),
    ));
    let orchestrator = EnrichmentOrchestrator::new(classifier, extractor, 1);

    let enriched = orchestrator.enrich(filtered).await;
    assert_eq!(enriched.len(), 3);

    // Record with a local entity: resolved with zero remote extraction calls.
    assert_eq!(
        enriched[0].location,
        LocationOutcome::Found("3300 South".to_string())
    );
    assert_eq!(enriched[0].issue_type, IssueType::Pothole);

    // Record without a local entity: one successful remote extraction,
    // quotes trimmed.
    assert_eq!(
        enriched[1].location,
        LocationOutcome::Found("Redwood Road".to_string())
    );
    assert_eq!(enriched[1].issue_type, IssueType::Accident);
    assert_eq!(enriched[1].sentiment, Sentiment::Neutral);

    // Record whose remote calls both fail: full sentinel outcome, batch
    // unharmed.
    assert_eq!(enriched[2].issue_type, IssueType::Error);
    assert_eq!(enriched[2].sentiment, Sentiment::Error);
    assert_eq!(enriched[2].location, LocationOutcome::Failed);

    assert_eq!(extract_model.calls.load(Ordering::SeqCst), 2);

    // Stage boundary: everything round-trips through the classified CSV.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classified.csv");
    csv_store::write_enriched(&path, &enriched).unwrap();
    let reloaded = csv_store::read_enriched(&path).unwrap();
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded[2].location, LocationOutcome::Failed);
    assert_eq!(reloaded[0].created_utc, enriched[0].created_utc);

    // The summary counts sentinels like any other category and excludes
    // non-found locations from the ranking.
    let summary = summarize(&reloaded);
    assert_eq!(summary.top_issue_types.len(), 3);
    assert!(summary
        .top_issue_types
        .contains(&(IssueType::Error, 1)));
    assert_eq!(
        summary.top_locations,
        vec![
            ("3300 South".to_string(), 1),
            ("Redwood Road".to_string(), 1)
        ]
    );
}
