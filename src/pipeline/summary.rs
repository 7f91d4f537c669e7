use crate::domain::{EnrichedRecord, IssueType, Sentiment, Summary};

const TOP_LOCATIONS: usize = 10;

/// Frequency counts over a batch of enriched records. The `error` sentinel
/// counts like any other category for issue types and sentiments; location
/// counts cover found locations only. Pure and recomputable; an empty batch
/// yields empty summaries.
pub fn summarize(records: &[EnrichedRecord]) -> Summary {
    let mut issue_counts: Vec<(IssueType, usize)> = Vec::new();
    let mut sentiment_counts: Vec<(Sentiment, usize)> = Vec::new();
    let mut location_counts: Vec<(String, usize)> = Vec::new();

    for record in records {
        bump(&mut issue_counts, record.issue_type);
        bump(&mut sentiment_counts, record.sentiment);
        if let Some(location) = record.location.found() {
            bump(&mut location_counts, location.to_string());
        }
    }

    // Stable sorts keep first-encountered order for equal counts.
    issue_counts.sort_by(|a, b| b.1.cmp(&a.1));
    sentiment_counts.sort_by(|a, b| b.1.cmp(&a.1));
    location_counts.sort_by(|a, b| b.1.cmp(&a.1));
    location_counts.truncate(TOP_LOCATIONS);

    Summary {
        top_issue_types: issue_counts,
        sentiment_summary: sentiment_counts,
        top_locations: location_counts,
    }
}

fn bump<K: PartialEq>(counts: &mut Vec<(K, usize)>, key: K) {
    if let Some(entry) = counts.iter_mut().find(|(k, _)| *k == key) {
        entry.1 += 1;
    } else {
        counts.push((key, 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocationOutcome, RawRecord, RecordKind};
    use chrono::Utc;

    fn enriched(
        issue_type: IssueType,
        sentiment: Sentiment,
        location: LocationOutcome,
    ) -> EnrichedRecord {
        let raw = RawRecord {
            subreddit: "SaltLakeCity".to_string(),
            kind: RecordKind::Post,
            title: "title".to_string(),
            body: "body".to_string(),
            url: "https://example.com".to_string(),
            score: Some(3),
            created_utc: Utc::now(),
            id: "id".to_string(),
        };
        EnrichedRecord::new(raw, issue_type, sentiment, location)
    }

    #[test]
    fn empty_batch_yields_empty_summary() {
        let summary = summarize(&[]);
        assert!(summary.top_issue_types.is_empty());
        assert!(summary.sentiment_summary.is_empty());
        assert!(summary.top_locations.is_empty());
    }

    #[test]
    fn excludes_null_and_error_locations_from_ranking() {
        let mut records = Vec::new();
        for _ in 0..5 {
            records.push(enriched(
                IssueType::Pothole,
                Sentiment::Angry,
                LocationOutcome::Found("Main St".to_string()),
            ));
        }
        for _ in 0..3 {
            records.push(enriched(
                IssueType::Traffic,
                Sentiment::Neutral,
                LocationOutcome::Found("5th Ave".to_string()),
            ));
        }
        for _ in 0..2 {
            records.push(enriched(
                IssueType::Other,
                Sentiment::Other,
                LocationOutcome::Absent,
            ));
        }
        records.push(enriched(
            IssueType::Error,
            Sentiment::Error,
            LocationOutcome::Failed,
        ));

        let summary = summarize(&records);

        assert_eq!(
            summary.top_locations,
            vec![("Main St".to_string(), 5), ("5th Ave".to_string(), 3)]
        );
    }

    #[test]
    fn error_sentinel_counts_as_a_category() {
        let records = vec![
            enriched(IssueType::Error, Sentiment::Error, LocationOutcome::Failed),
            enriched(IssueType::Error, Sentiment::Error, LocationOutcome::Failed),
            enriched(
                IssueType::Pothole,
                Sentiment::Angry,
                LocationOutcome::Absent,
            ),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.top_issue_types[0], (IssueType::Error, 2));
        assert_eq!(summary.top_issue_types[1], (IssueType::Pothole, 1));
        assert_eq!(summary.sentiment_summary[0], (Sentiment::Error, 2));
    }

    #[test]
    fn location_ties_break_by_first_encounter() {
        let records = vec![
            enriched(
                IssueType::Pothole,
                Sentiment::Angry,
                LocationOutcome::Found("State Street".to_string()),
            ),
            enriched(
                IssueType::Pothole,
                Sentiment::Angry,
                LocationOutcome::Found("700 East".to_string()),
            ),
        ];

        let summary = summarize(&records);

        assert_eq!(
            summary.top_locations,
            vec![("State Street".to_string(), 1), ("700 East".to_string(), 1)]
        );
    }

    #[test]
    fn truncates_to_ten_locations() {
        let mut records = Vec::new();
        for i in 0..12 {
            // Location i appears (12 - i) times so the ranking is strict.
            for _ in 0..(12 - i) {
                records.push(enriched(
                    IssueType::Traffic,
                    Sentiment::Neutral,
                    LocationOutcome::Found(format!("{}00 South", i + 1)),
                ));
            }
        }

        let summary = summarize(&records);

        assert_eq!(summary.top_locations.len(), 10);
        assert_eq!(summary.top_locations[0], ("100 South".to_string(), 12));
    }
}
