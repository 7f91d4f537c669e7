use crate::app::ports::{ChatModel, EntityRecognizer};
use crate::common::constants::NULL_LITERAL;
use crate::domain::LocationOutcome;
use std::sync::Arc;
use tracing::warn;

const SYSTEM_PROMPT: &str = "You extract road-related location names from Reddit posts.";

/// Hybrid location extraction: the cheap local recognizer handles the
/// common case, and the remote model only fires for texts with no
/// recognizable place entity, bounding remote-call volume.
pub struct LocationExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
    model: Arc<dyn ChatModel>,
}

impl LocationExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, model: Arc<dyn ChatModel>) -> Self {
        Self { recognizer, model }
    }

    pub async fn extract(&self, text: &str) -> LocationOutcome {
        // Stage 1: first place entity in recognizer order wins, and no
        // remote call is made on this path.
        if let Some(entity) = self
            .recognizer
            .entities(text)
            .into_iter()
            .find(|e| e.is_place())
        {
            return LocationOutcome::Found(entity.text);
        }

        // Stage 2: remote fallback. A literal "null" answer is an explicit
        // absence; a failed call is the distinct `error` outcome.
        match self.model.complete(SYSTEM_PROMPT, &build_prompt(text)).await {
            Ok(raw) => {
                let answer = raw.trim().trim_matches('"').trim();
                if answer == NULL_LITERAL {
                    LocationOutcome::Absent
                } else {
                    LocationOutcome::Found(answer.to_string())
                }
            }
            Err(reason) => {
                warn!("Location extraction failed, recording sentinel: {reason}");
                LocationOutcome::Failed
            }
        }
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        "Given the following Reddit post text, extract the most specific location mentioned \
         (e.g., street name, freeway, intersection, neighborhood, or landmark). \
         If no location is mentioned, respond with \"null\".\n\
         \n\
         Text:\n\
         {text}\n\
         \n\
         Respond with just the location string or \"null\"."
    )
}
