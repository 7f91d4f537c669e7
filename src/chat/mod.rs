use crate::app::ports::ChatModel;
use crate::domain::Summary;
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You answer questions based on a structured dataset summary.";

/// Question-answering assistant over a precomputed batch summary. Each
/// question costs one chat-completion call; the summary is embedded in the
/// prompt rather than the raw records.
pub struct QaAssistant {
    model: Arc<dyn ChatModel>,
}

impl QaAssistant {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn answer(&self, question: &str, summary: &Summary) -> Result<String, String> {
        let prompt = build_prompt(question, summary);
        self.model.complete(SYSTEM_PROMPT, &prompt).await
    }

    /// Interactive loop; `exit` or `quit` ends it. Call failures print and
    /// the loop continues.
    pub async fn run_loop(&self, summary: &Summary) -> io::Result<()> {
        println!("🤖 Road Sentiment Chatbot");
        println!("Type a question or type 'exit' to quit.\n");

        let stdin = io::stdin();
        loop {
            print!("You: ");
            io::stdout().flush()?;

            let mut question = String::new();
            if stdin.lock().read_line(&mut question)? == 0 {
                break;
            }
            let question = question.trim();
            if question.is_empty() {
                continue;
            }
            if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
                break;
            }

            match self.answer(question, summary).await {
                Ok(answer) => println!("\n🧠 {answer}\n"),
                Err(e) => println!("\n❌ Error: {e}\n"),
            }
        }
        Ok(())
    }
}

fn build_prompt(question: &str, summary: &Summary) -> String {
    let mut sections = String::new();
    let _ = writeln!(sections, "Top Issue Types:");
    for (issue_type, count) in &summary.top_issue_types {
        let _ = writeln!(sections, "- {issue_type}: {count}");
    }
    let _ = writeln!(sections, "\nSentiment Summary:");
    for (sentiment, count) in &summary.sentiment_summary {
        let _ = writeln!(sections, "- {sentiment}: {count}");
    }
    let _ = writeln!(sections, "\nTop Locations:");
    for (location, count) in &summary.top_locations {
        let _ = writeln!(sections, "- {location}: {count}");
    }

    format!(
        "You are a data analysis assistant. You are working with a dataset of Reddit posts \
         related to road issues in Salt Lake City.\n\
         \n\
         The dataset has already been analyzed. Here's a summary of key points:\n\
         \n\
         {sections}\n\
         Now, based on this summary, answer the following user question:\n\
         \n\
         \"{question}\"\n\
         \n\
         Answer clearly and concisely."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssueType, Sentiment};
    use async_trait::async_trait;

    struct EchoModel;

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn complete(&self, _system: &str, user: &str) -> Result<String, String> {
            Ok(user.to_string())
        }
    }

    #[tokio::test]
    async fn prompt_embeds_summary_and_question() {
        let summary = Summary {
            top_issue_types: vec![(IssueType::Pothole, 7)],
            sentiment_summary: vec![(Sentiment::Angry, 4)],
            top_locations: vec![("Main St".to_string(), 5)],
        };
        let assistant = QaAssistant::new(Arc::new(EchoModel));

        let prompt = assistant
            .answer("Where are the potholes?", &summary)
            .await
            .unwrap();

        assert!(prompt.contains("pothole: 7"));
        assert!(prompt.contains("angry: 4"));
        assert!(prompt.contains("Main St: 5"));
        assert!(prompt.contains("Where are the potholes?"));
    }
}
