use actix_web::{HttpRequest, Responder, post, web};
use common::{
    error::{AppError, Res},
    http::Success,
};
use db::subscriptions::SubscriptionStore;
use providers::ports::{BillingEvent, PaymentGateway};

use crate::{dtos::billing::WebhookAck, services};

/// Handles Stripe webhook events for payment processing.
///
/// # Input
/// - `payload`: raw request body, byte-for-byte as Stripe signed it
/// - `req`: HTTP request carrying the `stripe-signature` header
///
/// # Output
/// - Success: 200 `{"received": true}` for every verified event, whether it
///   was acted on or ignored
/// - Error: 400 for a missing or invalid signature (nothing is persisted),
///   500 when recording the subscription fails
///
/// # Note
/// This endpoint is not called from the frontend. Stripe's servers call it
/// for the events selected in the dashboard (at minimum
/// `checkout.session.completed`); the signing secret from that webhook
/// configuration is set as STRIPE_WEBHOOK_SECRET.
#[post("/stripe/webhook")]
async fn post_webhook(
    payload: web::Bytes,
    req: HttpRequest,
    gateway: web::Data<dyn PaymentGateway>,
    store: web::Data<dyn SubscriptionStore>,
) -> Res<impl Responder> {
    let signature = match req.headers().get("stripe-signature") {
        Some(signature) => signature.to_str().unwrap_or(""),
        None => return Err(AppError::BadRequest("Stripe signature missing".to_string())),
    };

    match gateway.verify_event(&payload, signature)? {
        BillingEvent::CheckoutCompleted(checkout) => {
            services::webhook::record_checkout(store.get_ref(), checkout).await?;
        }
        BillingEvent::Ignored(event_type) => {
            log::info!("Unhandled event type: {}", event_type);
        }
    }

    Success::ok(WebhookAck { received: true })
}
