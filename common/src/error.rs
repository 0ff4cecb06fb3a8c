use actix_web::HttpResponse;
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Stripe error: {0}")]
    Stripe(#[from] stripe::StripeError),

    // === APPLICATION ERRORS ===
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream provider error: {0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Client mistakes map to 400, everything else to 500. Provider failures
    /// keep the upstream message in the body so callers can see what the
    /// provider rejected.
    pub fn to_http_response(&self) -> HttpResponse {
        match self {
            // === CONVERSION ERRORS ===
            AppError::Database(error) => {
                log::error!("Database error: {}", error);
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": error.to_string() }))
            }
            AppError::Reqwest(error) => {
                log::error!("Reqwest error: {}", error);
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": error.to_string() }))
            }
            AppError::Stripe(error) => {
                log::error!("Stripe error: {}", error);
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": error.to_string() }))
            }

            // === APPLICATION ERRORS ===
            AppError::BadRequest(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::Upstream(error) => {
                log::error!("Upstream provider error: {}", error);
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": error.to_string() }))
            }
            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": error.to_string() }))
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}
