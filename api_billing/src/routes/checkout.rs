use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
};
use providers::ports::PaymentGateway;

use crate::{
    dtos::billing::{CheckoutSessionRequest, CheckoutSessionResponse},
    services,
};

/// Creates a Stripe Checkout session and returns its hosted URL.
///
/// # Input
/// - `plan_type`: "subscription" for the recurring plan, anything else for
///   the one-time plan
/// - `price_id`: explicit price override, honored when `plan_type` is absent
/// - `user_id`, `email`: optional; forwarded as session metadata so the
///   webhook can attribute the purchase
///
/// # Output
/// - Success: 200 with `{"url": "https://checkout.stripe.com/..."}` to
///   redirect the customer to
/// - Error: 400 when no price can be resolved from the request, 500 when
///   Stripe rejects the session
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/create-checkout-session', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({
///     plan_type: 'subscription',
///     user_id: currentUser.id,
///     email: currentUser.email
///   })
/// });
/// const { url } = await response.json();
/// window.location.href = url;
/// ```
#[post("/create-checkout-session")]
async fn post_checkout_session(
    req: web::Json<CheckoutSessionRequest>,
    config: web::Data<Arc<Config>>,
    gateway: web::Data<dyn PaymentGateway>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    let spec = match services::checkout::resolve_checkout(&config.stripe, &req) {
        Some(spec) => spec,
        None => {
            return Err(AppError::BadRequest(
                "No price is configured for the requested plan".to_string(),
            ));
        }
    };

    let url = gateway.create_checkout(spec).await?;

    Success::ok(CheckoutSessionResponse { url })
}
