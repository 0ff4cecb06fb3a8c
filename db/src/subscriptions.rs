use std::sync::Arc;

use async_trait::async_trait;
use common::error::{AppError, Res};
use mockall::automock;
use sqlx::PgPool;

use crate::{dtos::subscription::SubscriptionUpsert, models::subscription::SubscriptionRecord};

/// Write side of the `subscriptions` table, behind a trait so route handlers
/// can be tested without Postgres.
#[automock]
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Inserts the record for `data.user_id`, or refreshes it if one already
    /// exists. Either way the row ends up with status `active`, so replayed
    /// checkout events collapse into a single logical record.
    async fn upsert_active(&self, data: SubscriptionUpsert) -> Res<SubscriptionRecord>;
}

pub struct PgSubscriptionStore {
    pool: Arc<PgPool>,
}

impl PgSubscriptionStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        PgSubscriptionStore { pool }
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn upsert_active(&self, data: SubscriptionUpsert) -> Res<SubscriptionRecord> {
        sqlx::query_as::<_, SubscriptionRecord>(
            r#"
            INSERT INTO subscriptions (user_id, email, plan_type, stripe_customer_id, subscription_status)
            VALUES ($1, $2, $3, $4, 'active')
            ON CONFLICT (user_id) DO UPDATE
            SET email = COALESCE(EXCLUDED.email, subscriptions.email),
                plan_type = EXCLUDED.plan_type,
                stripe_customer_id = COALESCE(EXCLUDED.stripe_customer_id, subscriptions.stripe_customer_id),
                subscription_status = 'active',
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(&data.user_id)
        .bind(&data.email)
        .bind(&data.plan_type)
        .bind(&data.stripe_customer_id)
        .fetch_one(&*self.pool)
        .await
        .map_err(AppError::from)
    }
}
