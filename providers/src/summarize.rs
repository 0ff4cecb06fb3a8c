use async_trait::async_trait;
use common::{
    env_config::AiConfig,
    error::{AppError, Res},
};
use serde::{Deserialize, Serialize};

use crate::ports::Summarizer;

/// Instructions prepended to every transcript sent for summarization.
const SUMMARY_PROMPT: &str = "You are a study assistant. Summarize the following lecture \
transcript into clear, well-organized notes: a short overview, the key concepts with brief \
explanations, and any assignments or deadlines that were mentioned.";

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Summarizes transcripts through a chat-completions endpoint with a fixed
/// prompt.
pub struct ChatSummarizer {
    http: reqwest::Client,
    config: AiConfig,
}

impl ChatSummarizer {
    pub fn new(config: AiConfig) -> Self {
        ChatSummarizer {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, transcript: String) -> Res<String> {
        let request = ChatCompletionRequest {
            model: self.config.summary_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SUMMARY_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: transcript,
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.llm_base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "summarization failed: {status}: {body}"
            )));
        }

        let completion = response.json::<ChatCompletionResponse>().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Upstream("summarization returned no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> AiConfig {
        AiConfig {
            api_key: "test-key".to_string(),
            transcribe_base_url: base_url.clone(),
            llm_base_url: base_url,
            transcribe_model: "whisper-1".to_string(),
            summary_model: "gpt-4o-mini".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "choices": [
                        {"message": {"role": "assistant", "content": "- Intro to sorting\n- Quicksort beats bubble sort"}}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let summarizer = ChatSummarizer::new(test_config(server.url()));
        let summary = summarizer
            .summarize("Today we cover sorting algorithms...".to_string())
            .await
            .unwrap();

        assert!(summary.contains("Quicksort"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_choices_map_to_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let summarizer = ChatSummarizer::new(test_config(server.url()));
        let err = summarizer
            .summarize("transcript".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn provider_rejection_maps_to_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error": {"message": "Rate limit reached"}}"#)
            .create_async()
            .await;

        let summarizer = ChatSummarizer::new(test_config(server.url()));
        let err = summarizer
            .summarize("transcript".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }
}
