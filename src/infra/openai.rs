use crate::app::ports::ChatModel;
use async_trait::async_trait;
use serde_json::{json, Value};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Thin chat-completions adapter. Failures surface as `Err(String)`; the
/// pipeline stages decide how to degrade.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f64,
}

impl OpenAiChat {
    pub fn new(api_key: String, model: String, temperature: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String, String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "temperature": self.temperature,
        });

        let resp = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("chat completion request failed: {e}"))?;

        let status = resp.status();
        let payload: Value = resp
            .json()
            .await
            .map_err(|e| format!("chat completion body unreadable: {e}"))?;

        if !status.is_success() {
            let detail = payload["error"]["message"].as_str().unwrap_or("no detail");
            return Err(format!("chat completion returned {status}: {detail}"));
        }

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| "chat completion response missing message content".to_string())
    }
}
