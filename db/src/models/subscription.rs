use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub user_id: String,
    pub email: Option<String>,
    pub plan_type: String,
    pub stripe_customer_id: Option<String>,
    pub subscription_status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
