#[derive(Debug, Clone)]
pub struct SubscriptionUpsert {
    pub user_id: String,
    pub email: Option<String>,
    pub plan_type: String,
    pub stripe_customer_id: Option<String>,
}
