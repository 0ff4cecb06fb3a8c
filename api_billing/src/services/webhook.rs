use common::error::Res;
use db::{
    dtos::subscription::SubscriptionUpsert, models::subscription::SubscriptionRecord,
    subscriptions::SubscriptionStore,
};
use providers::ports::CheckoutCompleted;

/// Fallback for metadata the checkout session did not carry.
const UNKNOWN: &str = "unknown";

/// Records a completed checkout as an active subscription keyed by the user
/// id from the session metadata. Replayed events land on the same row.
pub async fn record_checkout(
    store: &dyn SubscriptionStore,
    checkout: CheckoutCompleted,
) -> Res<SubscriptionRecord> {
    let data = SubscriptionUpsert {
        user_id: checkout
            .metadata
            .get("user_id")
            .cloned()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        email: checkout.metadata.get("email").cloned(),
        plan_type: checkout
            .metadata
            .get("plan_type")
            .cloned()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        stripe_customer_id: checkout.customer_id,
    };

    log::info!("Recording completed checkout for user {}", data.user_id);
    store.upsert_active(data).await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use db::subscriptions::MockSubscriptionStore;

    use super::*;

    fn record_from(data: &SubscriptionUpsert) -> SubscriptionRecord {
        SubscriptionRecord {
            user_id: data.user_id.clone(),
            email: data.email.clone(),
            plan_type: data.plan_type.clone(),
            stripe_customer_id: data.stripe_customer_id.clone(),
            subscription_status: "active".to_string(),
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
        }
    }

    #[actix_web::test]
    async fn metadata_flows_into_the_record() {
        let mut metadata = HashMap::new();
        metadata.insert("user_id".to_string(), "user-42".to_string());
        metadata.insert("plan_type".to_string(), "subscription".to_string());
        metadata.insert("email".to_string(), "student@example.com".to_string());

        let mut store = MockSubscriptionStore::new();
        store
            .expect_upsert_active()
            .withf(|data| {
                data.user_id == "user-42"
                    && data.plan_type == "subscription"
                    && data.email.as_deref() == Some("student@example.com")
                    && data.stripe_customer_id.as_deref() == Some("cus_123")
            })
            .times(1)
            .returning(|data| Ok(record_from(&data)));

        let record = record_checkout(
            &store,
            CheckoutCompleted {
                customer_id: Some("cus_123".to_string()),
                metadata,
            },
        )
        .await
        .unwrap();

        assert_eq!(record.subscription_status, "active");
    }

    #[actix_web::test]
    async fn missing_metadata_falls_back_to_unknown() {
        let mut store = MockSubscriptionStore::new();
        store
            .expect_upsert_active()
            .withf(|data| {
                data.user_id == "unknown"
                    && data.plan_type == "unknown"
                    && data.email.is_none()
                    && data.stripe_customer_id.is_none()
            })
            .times(1)
            .returning(|data| Ok(record_from(&data)));

        record_checkout(
            &store,
            CheckoutCompleted {
                customer_id: None,
                metadata: HashMap::new(),
            },
        )
        .await
        .unwrap();
    }
}
