use async_trait::async_trait;
use common::{
    env_config::AiConfig,
    error::{AppError, Res},
};
use reqwest::multipart;

use crate::ports::Transcriber;

/// Whisper-style transcription client. Ships the audio as a multipart form
/// and asks for plain-text output so no response parsing is needed.
pub struct WhisperTranscriber {
    http: reqwest::Client,
    config: AiConfig,
}

impl WhisperTranscriber {
    pub fn new(config: AiConfig) -> Self {
        WhisperTranscriber {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, file_name: String, audio: Vec<u8>) -> Res<String> {
        let part = multipart::Part::bytes(audio).file_name(file_name);
        let form = multipart::Form::new()
            .text("model", self.config.transcribe_model.clone())
            .text("response_format", "text")
            .part("file", part);

        let response = self
            .http
            .post(format!(
                "{}/audio/transcriptions",
                self.config.transcribe_base_url
            ))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "transcription failed: {status}: {body}"
            )));
        }

        Ok(response.text().await?.trim().to_string())
    }
}
