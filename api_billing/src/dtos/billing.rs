use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CheckoutSessionRequest {
    /// Plan selector; "subscription" buys the recurring plan, anything else
    /// the one-time plan.
    pub plan_type: Option<String>,
    /// Explicit price override, honored when no plan type is given.
    #[serde(alias = "priceId")]
    pub price_id: Option<String>,
    /// Forwarded to Stripe as session metadata for webhook attribution.
    pub user_id: Option<String>,
    /// Prefills the checkout page and travels in the session metadata.
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct CheckoutSessionResponse {
    pub url: String,
}

#[derive(Deserialize)]
pub struct PortalSessionRequest {
    pub customer_id: Option<String>,
    pub return_url: Option<String>,
}

#[derive(Serialize)]
pub struct PortalSessionResponse {
    pub url: String,
}

#[derive(Serialize)]
pub struct WebhookAck {
    pub received: bool,
}
