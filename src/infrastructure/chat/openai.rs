use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    entities::chat::HistoryEntry,
    repositories::completion::{CompletionError, CompletionRepository},
    settings::AppConfig,
};

const TEMPERATURE: f32 = 0.7;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [HistoryEntry],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl HttpCompletionClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .user_agent(concat!("portfolio-site/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.chat_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });

        HttpCompletionClient {
            client,
            endpoint: config.chat_api_url.clone().filter(|url| !url.trim().is_empty()),
            api_key: config.chat_api_key.clone().filter(|key| !key.trim().is_empty()),
            model: config.chat_model.clone(),
            max_tokens: config.chat_max_tokens,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

#[async_trait]
impl CompletionRepository for HttpCompletionClient {
    async fn complete(&self, messages: &[HistoryEntry]) -> Result<String, CompletionError> {
        let endpoint = self.endpoint.as_deref().ok_or(CompletionError::NotConfigured)?;

        let body = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
        };

        let mut request = self.client.post(endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Status(status.as_u16()));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(CompletionError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn unconfigured_client_reports_not_configured() {
        let config = AppConfig { chat_api_url: None, ..AppConfig::default() };
        let client = HttpCompletionClient::new(&config);
        assert!(!client.is_configured());

        let err = client.complete(&[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::NotConfigured));
    }

    #[test]
    fn reads_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":" Hi there "}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some(" Hi there "));
    }
}
