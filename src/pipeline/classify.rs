use crate::app::ports::ChatModel;
use crate::common::constants::{ISSUE_TYPES, SENTIMENTS};
use crate::domain::{IssueType, Sentiment};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

const SYSTEM_PROMPT: &str = "You classify road-related Reddit posts.";

/// Assigns an issue type and sentiment to a record with one combined
/// chat-completion call. Any failure along the way degrades to the
/// `(error, error)` sentinel pair; a single bad classification must never
/// abort a batch.
pub struct IssueSentimentClassifier {
    model: Arc<dyn ChatModel>,
}

/// Expected response shape. The body is an untrusted string from a remote
/// service and is only ever parsed, never evaluated.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassificationResponse {
    issue_type: String,
    sentiment: String,
}

impl IssueSentimentClassifier {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn classify(&self, text: &str) -> (IssueType, Sentiment) {
        match self.try_classify(text).await {
            Ok(pair) => pair,
            Err(reason) => {
                warn!("Classification failed, recording sentinel pair: {reason}");
                (IssueType::Error, Sentiment::Error)
            }
        }
    }

    async fn try_classify(&self, text: &str) -> Result<(IssueType, Sentiment), String> {
        let prompt = build_prompt(text);
        let content = self.model.complete(SYSTEM_PROMPT, &prompt).await?;
        let body = strip_code_fence(content.trim());

        let parsed: ClassificationResponse = serde_json::from_str(body)
            .map_err(|e| format!("malformed response {body:?}: {e}"))?;

        let issue_type: IssueType = parsed
            .issue_type
            .parse()
            .ok()
            .filter(|t| *t != IssueType::Error)
            .ok_or_else(|| format!("unknown issue type {:?}", parsed.issue_type))?;
        let sentiment: Sentiment = parsed
            .sentiment
            .parse()
            .ok()
            .filter(|s| *s != Sentiment::Error)
            .ok_or_else(|| format!("unknown sentiment {:?}", parsed.sentiment))?;

        Ok((issue_type, sentiment))
    }
}

fn build_prompt(text: &str) -> String {
    let issue_list = quote_join(&ISSUE_TYPES);
    let sentiment_list = quote_join(&SENTIMENTS);
    format!(
        "You are an assistant helping classify Reddit posts related to road issues.\n\
         \n\
         Given the text below, return:\n\
         1. The most likely issue type: {issue_list}\n\
         2. The sentiment of the post: {sentiment_list}\n\
         \n\
         Text:\n\
         {text}\n\
         \n\
         Respond in this JSON format:\n\
         {{\"issue_type\": \"...\", \"sentiment\": \"...\"}}"
    )
}

fn quote_join(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|i| format!("\"{i}\"")).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {last}", rest.join(", ")),
        _ => quoted.join(""),
    }
}

/// Models sometimes wrap JSON in a markdown fence; unwrap it before the
/// strict parse. Anything else malformed still fails the parse.
fn strip_code_fence(s: &str) -> &str {
    let Some(inner) = s.strip_prefix("```") else {
        return s;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
