use crate::domain::RawRecord;
use tracing::info;

/// Drops low-signal records before expensive enrichment. A record is
/// retained iff its body is at least `min_body_len` characters and its
/// score meets `min_score`; a missing score always fails the threshold.
/// Input order is preserved.
pub fn filter_records(records: Vec<RawRecord>, min_body_len: usize, min_score: i64) -> Vec<RawRecord> {
    let initial_count = records.len();
    let retained: Vec<RawRecord> = records
        .into_iter()
        .filter(|r| {
            r.body.chars().count() >= min_body_len
                && r.score.map_or(false, |s| s >= min_score)
        })
        .collect();
    info!(
        "Filtered down from {} to {} records",
        initial_count,
        retained.len()
    );
    retained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordKind;
    use chrono::Utc;

    fn record(id: &str, body: &str, score: Option<i64>) -> RawRecord {
        RawRecord {
            subreddit: "SaltLakeCity".to_string(),
            kind: RecordKind::Post,
            title: "title".to_string(),
            body: body.to_string(),
            url: "https://example.com".to_string(),
            score,
            created_utc: Utc::now(),
            id: id.to_string(),
        }
    }

    #[test]
    fn retains_only_records_meeting_both_thresholds() {
        let records = vec![
            record("long-high", "a detailed report about road damage", Some(5)),
            record("short-high", "short", Some(10)),
            record("long-low", "a detailed report about road damage", Some(1)),
            record("long-none", "a detailed report about road damage", None),
        ];

        let retained = filter_records(records, 10, 2);
        let ids: Vec<&str> = retained.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["long-high"]);
    }

    #[test]
    fn preserves_input_order() {
        let records = vec![
            record("a", "body text long enough", Some(3)),
            record("b", "nope", Some(3)),
            record("c", "another body long enough", Some(3)),
            record("d", "yet another body long enough", Some(3)),
        ];

        let retained = filter_records(records, 10, 2);
        let ids: Vec<&str> = retained.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn boundary_values_are_retained() {
        let records = vec![record("edge", "0123456789", Some(2))];
        let retained = filter_records(records, 10, 2);
        assert_eq!(retained.len(), 1);
    }
}
