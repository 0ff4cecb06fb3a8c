use actix_web::{Responder, post, web};
use common::{
    error::{AppError, Res},
    http::Success,
};
use providers::ports::{PaymentGateway, PortalSpec};

use crate::dtos::billing::{PortalSessionRequest, PortalSessionResponse};

/// Creates a Stripe billing-portal session for an existing customer.
///
/// # Input
/// - `customer_id`: the Stripe customer to open the portal for
/// - `return_url`: optional; where the portal sends the customer back to
///   (defaults to the configured return URL)
///
/// # Output
/// - Success: 200 with `{"url": ...}` to redirect the customer to
/// - Error: 400 when `customer_id` is missing or empty, 500 when Stripe
///   rejects the session
#[post("/create-portal-session")]
async fn post_portal_session(
    req: web::Json<PortalSessionRequest>,
    gateway: web::Data<dyn PaymentGateway>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    let customer_id = match req.customer_id {
        Some(customer_id) if !customer_id.trim().is_empty() => customer_id,
        _ => return Err(AppError::BadRequest("customer_id is required".to_string())),
    };

    let url = gateway
        .create_portal(PortalSpec {
            customer_id,
            return_url: req.return_url,
        })
        .await?;

    Success::ok(PortalSessionResponse { url })
}
