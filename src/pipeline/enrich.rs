use crate::domain::{EnrichedRecord, RawRecord};
use crate::pipeline::classify::IssueSentimentClassifier;
use crate::pipeline::extract::LocationExtractor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

/// Drives the per-record enrichment over a batch. Records are independent;
/// input order is preserved in the output, and no per-record failure
/// escapes the batch (the stages degrade to sentinels at the point of
/// call).
pub struct EnrichmentOrchestrator {
    classifier: Arc<IssueSentimentClassifier>,
    extractor: Arc<LocationExtractor>,
    workers: usize,
}

impl EnrichmentOrchestrator {
    /// `workers` bounds concurrent in-flight records; 1 reproduces strictly
    /// sequential semantics.
    pub fn new(
        classifier: Arc<IssueSentimentClassifier>,
        extractor: Arc<LocationExtractor>,
        workers: usize,
    ) -> Self {
        Self {
            classifier,
            extractor,
            workers: workers.max(1),
        }
    }

    pub async fn enrich(&self, records: Vec<RawRecord>) -> Vec<EnrichedRecord> {
        let total = records.len();
        if self.workers == 1 {
            let mut enriched = Vec::with_capacity(total);
            for (i, record) in records.into_iter().enumerate() {
                enriched.push(enrich_one(&self.classifier, &self.extractor, record).await);
                info!("Enriched {}/{} records", i + 1, total);
            }
            return enriched;
        }

        // Bounded fan-out; results are re-ordered by input index before
        // emitting so downstream consumers keep a stable one-to-one
        // correspondence with the source sequence.
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let done = Arc::new(AtomicUsize::new(0));
        let mut set: JoinSet<(usize, EnrichedRecord)> = JoinSet::new();
        for (i, record) in records.into_iter().enumerate() {
            let classifier = self.classifier.clone();
            let extractor = self.extractor.clone();
            let semaphore = semaphore.clone();
            let done = done.clone();
            set.spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                let enriched = enrich_one(&classifier, &extractor, record).await;
                let n = done.fetch_add(1, Ordering::SeqCst) + 1;
                info!("Enriched {n}/{total} records");
                (i, enriched)
            });
        }

        let mut indexed = Vec::with_capacity(total);
        while let Some(joined) = set.join_next().await {
            if let Ok(pair) = joined {
                indexed.push(pair);
            }
        }
        indexed.sort_by_key(|(i, _)| *i);
        indexed.into_iter().map(|(_, r)| r).collect()
    }
}

async fn enrich_one(
    classifier: &IssueSentimentClassifier,
    extractor: &LocationExtractor,
    record: RawRecord,
) -> EnrichedRecord {
    let text = record.classification_text();
    let (issue_type, sentiment) = classifier.classify(&text).await;
    let location = extractor.extract(&text).await;
    EnrichedRecord::new(record, issue_type, sentiment, location)
}

/// Deterministic sub-sampling to bound API cost during experimentation.
/// Survivors keep their input order; the same seed and fraction always
/// select the same subset.
pub fn sample_records(records: Vec<RawRecord>, frac: f64, seed: u64) -> Vec<RawRecord> {
    if frac >= 1.0 {
        return records;
    }
    let amount = ((records.len() as f64) * frac).round() as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices = rand::seq::index::sample(&mut rng, records.len(), amount).into_vec();
    indices.sort_unstable();

    let mut keep = indices.into_iter().peekable();
    records
        .into_iter()
        .enumerate()
        .filter(|(i, _)| {
            if keep.peek() == Some(i) {
                keep.next();
                true
            } else {
                false
            }
        })
        .map(|(_, r)| r)
        .collect()
}
