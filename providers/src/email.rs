use async_trait::async_trait;
use common::{
    env_config::EmailConfig,
    error::{AppError, Res},
};
use serde::Serialize;

use crate::ports::{EmailSender, OutboundEmail};

#[derive(Serialize)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
}

/// Transactional email over a Resend-style HTTP JSON API.
pub struct HttpEmailSender {
    http: reqwest::Client,
    config: EmailConfig,
}

impl HttpEmailSender {
    pub fn new(config: EmailConfig) -> Self {
        HttpEmailSender {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send_html(&self, email: OutboundEmail) -> Res<()> {
        let request = SendEmailRequest {
            from: self.config.from_address.clone(),
            to: vec![email.to],
            subject: email.subject,
            html: email.html,
        };

        let response = self
            .http
            .post(format!("{}/emails", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "email send failed: {status}: {body}"
            )));
        }

        Ok(())
    }
}
