//! Traits for every outbound provider the service talks to. The concrete
//! clients live in sibling modules; handlers only ever see these traits, so
//! route tests can swap in `mockall` doubles.

use std::collections::HashMap;

use async_trait::async_trait;
use common::error::Res;
use mockall::automock;

/// Grant handed to a caller who wants to pull a file straight from storage:
/// the URL plus the Authorization header value to present with it. The token
/// is account-wide, so it must never end up in logs.
#[derive(Debug, Clone)]
pub struct DownloadGrant {
    pub download_url: String,
    pub authorization: String,
}

#[automock]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Sends `bytes` to the bucket under `file_name` and relays the
    /// provider's response payload.
    async fn upload(&self, file_name: String, bytes: Vec<u8>) -> Res<serde_json::Value>;

    /// Issues a download URL + Authorization header for `file_name` without
    /// touching the object itself.
    async fn signed_download(&self, file_name: String) -> Res<DownloadGrant>;

    /// Fetches the object's bytes.
    async fn fetch(&self, file_name: String) -> Res<Vec<u8>>;
}

/// What the payment provider needs to know to open a checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSpec {
    pub price_id: String,
    pub plan_type: String,
    /// Recurring plans open a subscription-mode session, everything else a
    /// one-time payment-mode session.
    pub recurring: bool,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PortalSpec {
    pub customer_id: String,
    pub return_url: Option<String>,
}

/// A completed checkout reduced to what the subscription record needs.
#[derive(Debug, Clone)]
pub struct CheckoutCompleted {
    pub customer_id: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// Outcome of webhook verification: an event we act on, or a verified event
/// we acknowledge and drop.
#[derive(Debug, Clone)]
pub enum BillingEvent {
    CheckoutCompleted(CheckoutCompleted),
    Ignored(String),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a hosted checkout session and returns its URL.
    async fn create_checkout(&self, spec: CheckoutSpec) -> Res<String>;

    /// Creates a billing-portal session for an existing customer and returns
    /// its URL.
    async fn create_portal(&self, spec: PortalSpec) -> Res<String>;

    /// Verifies the webhook signature over the exact raw body and classifies
    /// the event. `BadRequest` when the signature does not check out.
    fn verify_event(&self, payload: &[u8], signature: &str) -> Res<BillingEvent>;
}

#[automock]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Turns audio bytes into transcript text. `file_name` travels along so
    /// the provider can sniff the container format from the extension.
    async fn transcribe(&self, file_name: String, audio: Vec<u8>) -> Res<String>;
}

#[automock]
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: String) -> Res<String>;
}

#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[automock]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_html(&self, email: OutboundEmail) -> Res<()>;
}
