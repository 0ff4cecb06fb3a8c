use std::collections::HashMap;

use async_trait::async_trait;
use common::{
    env_config::StripeConfig,
    error::{AppError, Res},
};
use stripe::{
    BillingPortalSession, CheckoutSession, CheckoutSessionMode, Client, CreateBillingPortalSession,
    CreateCheckoutSession, CustomerId, Event, EventObject, EventType, Webhook, WebhookError,
};

use crate::ports::{BillingEvent, CheckoutCompleted, CheckoutSpec, PaymentGateway, PortalSpec};

/// Stripe-backed payment gateway: hosted checkout, billing portal, webhook
/// verification.
pub struct StripeGateway {
    client: Client,
    config: StripeConfig,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Self {
        StripeGateway {
            client: Client::new(config.secret_key.clone()),
            config,
        }
    }

    /// Reduces a verified event to the cases the service acts on.
    fn classify(event: Event) -> BillingEvent {
        match event.type_ {
            EventType::CheckoutSessionCompleted => {
                if let EventObject::CheckoutSession(session) = event.data.object {
                    let customer_id = session
                        .customer
                        .as_ref()
                        .map(|customer| customer.id().to_string());
                    return BillingEvent::CheckoutCompleted(CheckoutCompleted {
                        customer_id,
                        metadata: session.metadata.unwrap_or_default(),
                    });
                }
                BillingEvent::Ignored("checkout.session.completed".to_string())
            }
            other => BillingEvent::Ignored(other.to_string()),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout(&self, spec: CheckoutSpec) -> Res<String> {
        // The webhook recovers identity from this metadata, so everything the
        // subscription record needs has to travel with the session.
        let mut metadata = HashMap::new();
        metadata.insert("plan_type".to_string(), spec.plan_type.clone());
        if let Some(user_id) = &spec.user_id {
            metadata.insert("user_id".to_string(), user_id.clone());
        }
        if let Some(email) = &spec.email {
            metadata.insert("email".to_string(), email.clone());
        }

        let mode = if spec.recurring {
            CheckoutSessionMode::Subscription
        } else {
            CheckoutSessionMode::Payment
        };

        let params = CreateCheckoutSession {
            payment_method_types: Some(vec![
                stripe::CreateCheckoutSessionPaymentMethodTypes::Card,
            ]),
            line_items: Some(vec![stripe::CreateCheckoutSessionLineItems {
                price: Some(spec.price_id.clone()),
                quantity: Some(1),
                ..Default::default()
            }]),
            mode: Some(mode),
            success_url: Some(self.config.success_url.as_str()),
            cancel_url: Some(self.config.cancel_url.as_str()),
            customer_email: spec.email.as_deref(),
            metadata: Some(metadata),
            ..Default::default()
        };

        let session = CheckoutSession::create(&self.client, params).await?;

        session
            .url
            .ok_or_else(|| AppError::Upstream("checkout session created without a URL".to_string()))
    }

    async fn create_portal(&self, spec: PortalSpec) -> Res<String> {
        let customer_id = spec
            .customer_id
            .parse::<CustomerId>()
            .map_err(|e| AppError::BadRequest(format!("Invalid customer ID: {}", e)))?;

        let mut params = CreateBillingPortalSession::new(customer_id);
        let return_url = spec
            .return_url
            .as_deref()
            .unwrap_or(self.config.portal_return_url.as_str());
        params.return_url = Some(return_url);

        let session = BillingPortalSession::create(&self.client, params).await?;
        Ok(session.url)
    }

    fn verify_event(&self, payload: &[u8], signature: &str) -> Res<BillingEvent> {
        let payload = std::str::from_utf8(payload)
            .map_err(|_| AppError::BadRequest("Webhook payload is not valid UTF-8".to_string()))?;

        match Webhook::construct_event(payload, signature, &self.config.webhook_secret) {
            Ok(event) => Ok(Self::classify(event)),
            // The signature check runs before event parsing, so a parse
            // failure means a genuine, verified event with a shape this
            // service does not recognize. Acknowledge it instead of making
            // the provider retry forever.
            Err(WebhookError::BadParse(e)) => {
                log::info!("Verified webhook event with unrecognized shape: {}", e);
                Ok(BillingEvent::Ignored("unrecognized".to_string()))
            }
            Err(e) => {
                log::error!("Error constructing webhook event: {}", e);
                Err(AppError::BadRequest(format!("Webhook Error: {}", e)))
            }
        }
    }
}
