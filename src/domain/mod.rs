use crate::common::constants::{ERROR_SENTINEL, NULL_LITERAL};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Whether a record came in as a submission or a comment on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Post,
    Comment,
}

/// One ingested post or comment, as produced by the ingestion client.
/// Immutable once created; the enrichment stages only ever read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub subreddit: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub url: String,
    /// Missing or unparseable scores deserialize to None and fail the
    /// retention threshold rather than defaulting to zero.
    #[serde(default)]
    pub score: Option<i64>,
    pub created_utc: DateTime<Utc>,
    pub id: String,
}

impl RawRecord {
    /// Text handed to the classifier and extractor: title and body joined
    /// by a single space.
    pub fn classification_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Pothole,
    Accident,
    Detour,
    Closure,
    Construction,
    Traffic,
    Other,
    Error,
}

impl FromStr for IssueType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "pothole" => Ok(Self::Pothole),
            "accident" => Ok(Self::Accident),
            "detour" => Ok(Self::Detour),
            "closure" => Ok(Self::Closure),
            "construction" => Ok(Self::Construction),
            "traffic" => Ok(Self::Traffic),
            "other" => Ok(Self::Other),
            "error" => Ok(Self::Error),
            _ => Err(()),
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pothole => "pothole",
            Self::Accident => "accident",
            Self::Detour => "detour",
            Self::Closure => "closure",
            Self::Construction => "construction",
            Self::Traffic => "traffic",
            Self::Other => "other",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Angry,
    Frustrated,
    Neutral,
    Helpful,
    Other,
    Error,
}

impl FromStr for Sentiment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "angry" => Ok(Self::Angry),
            "frustrated" => Ok(Self::Frustrated),
            "neutral" => Ok(Self::Neutral),
            "helpful" => Ok(Self::Helpful),
            "other" => Ok(Self::Other),
            "error" => Ok(Self::Error),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Angry => "angry",
            Self::Frustrated => "frustrated",
            Self::Neutral => "neutral",
            Self::Helpful => "helpful",
            Self::Other => "other",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Outcome of location extraction for one record.
///
/// `Absent` (the model explicitly answered that no location is mentioned)
/// and `Failed` (the extraction call itself failed) are distinct: downstream
/// geocoding skips both, but only `Failed` counts as an error outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationOutcome {
    Found(String),
    Absent,
    Failed,
}

impl LocationOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Found(s) => s,
            Self::Absent => NULL_LITERAL,
            Self::Failed => ERROR_SENTINEL,
        }
    }

    pub fn found(&self) -> Option<&str> {
        match self {
            Self::Found(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for LocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for LocationOutcome {
    fn from(s: &str) -> Self {
        match s {
            NULL_LITERAL => Self::Absent,
            ERROR_SENTINEL => Self::Failed,
            other => Self::Found(other.to_string()),
        }
    }
}

// Persist as the plain string so CSV columns round-trip the sentinel
// literals unchanged.
impl Serialize for LocationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LocationOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LocationOutcome::from(s.as_str()))
    }
}

/// A filtered record with its enrichment results attached. Created exactly
/// once per retained record and never mutated afterward.
///
/// Invariant: `issue_type` and `sentiment` are both `error` or both
/// non-error, since they come from one combined classification call.
/// `location` has its own independent failure mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub subreddit: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub url: String,
    #[serde(default)]
    pub score: Option<i64>,
    pub created_utc: DateTime<Utc>,
    pub id: String,
    pub issue_type: IssueType,
    pub sentiment: Sentiment,
    pub location: LocationOutcome,
}

impl EnrichedRecord {
    pub fn new(
        raw: RawRecord,
        issue_type: IssueType,
        sentiment: Sentiment,
        location: LocationOutcome,
    ) -> Self {
        Self {
            subreddit: raw.subreddit,
            kind: raw.kind,
            title: raw.title,
            body: raw.body,
            url: raw.url,
            score: raw.score,
            created_utc: raw.created_utc,
            id: raw.id,
            issue_type,
            sentiment,
            location,
        }
    }
}

/// Descriptive statistics over a batch of enriched records. Derived and
/// recomputable at any time; holds no independent state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    /// Issue type frequencies, count-descending, `error` included.
    pub top_issue_types: Vec<(IssueType, usize)>,
    /// Sentiment frequencies, count-descending, `error` included.
    pub sentiment_summary: Vec<(Sentiment, usize)>,
    /// The ten most frequent extracted locations; `null` and `error`
    /// outcomes are excluded, ties broken by first encounter.
    pub top_locations: Vec<(String, usize)>,
}
