use common::env_config::StripeConfig;
use providers::ports::CheckoutSpec;

use crate::dtos::billing::CheckoutSessionRequest;

/// Decides which price a checkout request pays and in which mode.
///
/// `plan_type` wins when present: "subscription" buys the recurring price,
/// anything else the one-time price. Without a plan type an explicit
/// `price_id` is honored as a one-time purchase. Returns `None` when neither
/// yields a usable price id; callers turn that into a 400, never a 500.
pub fn resolve_checkout(
    config: &StripeConfig,
    req: &CheckoutSessionRequest,
) -> Option<CheckoutSpec> {
    let plan_type = req.plan_type.as_deref().filter(|plan| !plan.is_empty());

    let (price_id, plan_type, recurring) = match plan_type {
        Some("subscription") => (
            config.price_id_subscription.clone(),
            "subscription".to_string(),
            true,
        ),
        Some(other) => (config.price_id_single.clone(), other.to_string(), false),
        None => match req.price_id.as_deref() {
            Some(price_id) if !price_id.is_empty() => {
                (price_id.to_string(), "single".to_string(), false)
            }
            _ => return None,
        },
    };

    if price_id.is_empty() {
        return None;
    }

    Some(CheckoutSpec {
        price_id,
        plan_type,
        recurring,
        user_id: req.user_id.clone(),
        email: req.email.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StripeConfig {
        StripeConfig {
            secret_key: "sk_test_123".to_string(),
            webhook_secret: "whsec_test".to_string(),
            price_id_subscription: "price_sub".to_string(),
            price_id_single: "price_single".to_string(),
            success_url: "http://localhost:3000/success".to_string(),
            cancel_url: "http://localhost:3000/cancel".to_string(),
            portal_return_url: "http://localhost:3000/account".to_string(),
        }
    }

    fn request(plan_type: Option<&str>, price_id: Option<&str>) -> CheckoutSessionRequest {
        CheckoutSessionRequest {
            plan_type: plan_type.map(str::to_string),
            price_id: price_id.map(str::to_string),
            user_id: Some("user-1".to_string()),
            email: Some("student@example.com".to_string()),
        }
    }

    #[test]
    fn subscription_plan_is_recurring() {
        let spec = resolve_checkout(&test_config(), &request(Some("subscription"), None)).unwrap();
        assert_eq!(spec.price_id, "price_sub");
        assert_eq!(spec.plan_type, "subscription");
        assert!(spec.recurring);
        assert_eq!(spec.user_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn other_plan_types_buy_the_one_time_price() {
        let spec = resolve_checkout(&test_config(), &request(Some("single"), None)).unwrap();
        assert_eq!(spec.price_id, "price_single");
        assert_eq!(spec.plan_type, "single");
        assert!(!spec.recurring);
    }

    #[test]
    fn explicit_price_id_is_honored_without_a_plan_type() {
        let spec = resolve_checkout(&test_config(), &request(None, Some("price_custom"))).unwrap();
        assert_eq!(spec.price_id, "price_custom");
        assert_eq!(spec.plan_type, "single");
        assert!(!spec.recurring);
    }

    #[test]
    fn plan_type_takes_precedence_over_price_id() {
        let spec = resolve_checkout(
            &test_config(),
            &request(Some("subscription"), Some("price_custom")),
        )
        .unwrap();
        assert_eq!(spec.price_id, "price_sub");
        assert!(spec.recurring);
    }

    #[test]
    fn nothing_to_resolve_yields_none() {
        assert!(resolve_checkout(&test_config(), &request(None, None)).is_none());
        assert!(resolve_checkout(&test_config(), &request(None, Some(""))).is_none());
    }

    #[test]
    fn unconfigured_price_yields_none() {
        let mut config = test_config();
        config.price_id_subscription = String::new();
        assert!(resolve_checkout(&config, &request(Some("subscription"), None)).is_none());
    }
}
