use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::{
    env_config::StorageConfig,
    error::{AppError, Res},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::ports::{DownloadGrant, ObjectStorage};

/// Everything except RFC 3986 unreserved characters and `/` is escaped in
/// file names; the provider decodes the header on its side.
const FILE_NAME_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Account tokens are valid for 24 hours; refresh well before that.
const AUTH_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Sentinel telling the provider to skip server-side checksum verification.
const SHA1_DO_NOT_VERIFY: &str = "do_not_verify";

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSession {
    api_url: String,
    download_url: String,
    authorization_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadTarget {
    upload_url: String,
    authorization_token: String,
}

struct CachedAuth {
    session: AuthSession,
    acquired_at: Instant,
}

/// Distinguishes a rejected token (worth exactly one re-authorization) from
/// every other failure.
enum AttemptError {
    TokenRejected,
    Failed(AppError),
}

impl AttemptError {
    fn into_app_error(self) -> AppError {
        match self {
            AttemptError::TokenRejected => AppError::Upstream(
                "storage rejected a freshly issued authorization token".to_string(),
            ),
            AttemptError::Failed(err) => err,
        }
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(err: reqwest::Error) -> Self {
        AttemptError::Failed(AppError::from(err))
    }
}

/// Client for the native B2-style HTTP API. One account authorization is
/// shared by all requests and refreshed only on expiry or after the provider
/// answers 401.
pub struct B2Storage {
    http: reqwest::Client,
    config: StorageConfig,
    auth: Mutex<Option<CachedAuth>>,
}

impl B2Storage {
    pub fn new(config: StorageConfig) -> Self {
        B2Storage {
            http: reqwest::Client::new(),
            config,
            auth: Mutex::new(None),
        }
    }

    /// Returns the cached account session, authorizing against the provider
    /// if the cache is empty or stale. The lock is held across the network
    /// call so a burst of requests performs a single authorization.
    async fn session(&self) -> Res<AuthSession> {
        let mut cached = self.auth.lock().await;
        if let Some(auth) = cached.as_ref() {
            if auth.acquired_at.elapsed() < AUTH_TTL {
                return Ok(auth.session.clone());
            }
        }

        let session = self.authorize().await?;
        *cached = Some(CachedAuth {
            session: session.clone(),
            acquired_at: Instant::now(),
        });
        Ok(session)
    }

    async fn invalidate(&self) {
        *self.auth.lock().await = None;
    }

    async fn authorize(&self) -> Res<AuthSession> {
        let url = format!(
            "{}/b2api/v2/b2_authorize_account",
            self.config.auth_base_url
        );
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.application_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "storage authorization failed: {status}: {body}"
            )));
        }

        Ok(response.json::<AuthSession>().await?)
    }

    async fn upload_once(
        &self,
        session: &AuthSession,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<serde_json::Value, AttemptError> {
        let url = format!("{}/b2api/v2/b2_get_upload_url", session.api_url);
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, &session.authorization_token)
            .json(&serde_json::json!({ "bucketId": self.config.bucket_id }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AttemptError::TokenRejected);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Failed(AppError::Upstream(format!(
                "storage upload-url request failed: {status}: {body}"
            ))));
        }

        let target = response.json::<UploadTarget>().await?;

        let response = self
            .http
            .post(&target.upload_url)
            .header(AUTHORIZATION, &target.authorization_token)
            .header("X-Bz-File-Name", encode_file_name(file_name))
            .header(CONTENT_TYPE, "b2/x-auto")
            .header("X-Bz-Content-Sha1", SHA1_DO_NOT_VERIFY)
            .body(bytes.to_vec())
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AttemptError::TokenRejected);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Failed(AppError::Upstream(format!(
                "storage upload failed: {status}: {body}"
            ))));
        }

        Ok(response.json::<serde_json::Value>().await?)
    }

    async fn fetch_once(
        &self,
        session: &AuthSession,
        file_name: &str,
    ) -> Result<Vec<u8>, AttemptError> {
        let url = self.download_url(session, file_name);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, &session.authorization_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AttemptError::TokenRejected);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Failed(AppError::Upstream(format!(
                "storage download failed: {status}: {body}"
            ))));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn download_url(&self, session: &AuthSession, file_name: &str) -> String {
        format!(
            "{}/file/{}/{}",
            session.download_url,
            self.config.bucket_name,
            encode_file_name(file_name)
        )
    }
}

#[async_trait]
impl ObjectStorage for B2Storage {
    async fn upload(&self, file_name: String, bytes: Vec<u8>) -> Res<serde_json::Value> {
        let session = self.session().await?;
        match self.upload_once(&session, &file_name, &bytes).await {
            Ok(result) => Ok(result),
            Err(AttemptError::TokenRejected) => {
                log::info!("storage token rejected during upload, re-authorizing once");
                self.invalidate().await;
                let session = self.session().await?;
                self.upload_once(&session, &file_name, &bytes)
                    .await
                    .map_err(AttemptError::into_app_error)
            }
            Err(AttemptError::Failed(err)) => Err(err),
        }
    }

    async fn signed_download(&self, file_name: String) -> Res<DownloadGrant> {
        let session = self.session().await?;
        Ok(DownloadGrant {
            download_url: self.download_url(&session, &file_name),
            authorization: session.authorization_token,
        })
    }

    async fn fetch(&self, file_name: String) -> Res<Vec<u8>> {
        let session = self.session().await?;
        match self.fetch_once(&session, &file_name).await {
            Ok(bytes) => Ok(bytes),
            Err(AttemptError::TokenRejected) => {
                log::info!("storage token rejected during download, re-authorizing once");
                self.invalidate().await;
                let session = self.session().await?;
                self.fetch_once(&session, &file_name)
                    .await
                    .map_err(AttemptError::into_app_error)
            }
            Err(AttemptError::Failed(err)) => Err(err),
        }
    }
}

fn encode_file_name(file_name: &str) -> String {
    utf8_percent_encode(file_name, FILE_NAME_SET).to_string()
}
