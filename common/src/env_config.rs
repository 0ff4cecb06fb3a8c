use std::{env, sync::Arc};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// This struct holds all the necessary configuration parameters
/// required to initialize and run the server.
/// It includes database connection details, server host and port,
/// number of worker threads, CORS settings, logging preferences,
/// and the credentials for every external provider the service
/// talks to (object storage, Stripe, transcription/summarization,
/// transactional email).
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origins for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origins: Vec<String>,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Configuration for the object storage provider.
    pub storage: StorageConfig,
    /// Configuration for Stripe checkout, billing portal and webhooks.
    pub stripe: StripeConfig,
    /// Configuration for the transcription and summarization provider.
    pub ai: AiConfig,
    /// Configuration for the transactional email provider.
    pub email: EmailConfig,
}

#[derive(Clone, Debug)]
/// Credentials and addressing for the B2-style object storage provider.
///
/// The account is authorized with `key_id` + `application_key`; uploads and
/// downloads are scoped to a single bucket identified by `bucket_id` (API
/// calls) and `bucket_name` (download URLs).
pub struct StorageConfig {
    /// The application key ID used for the account authorization call.
    pub key_id: String,
    /// The application key paired with `key_id`.
    pub application_key: String,
    /// The ID of the bucket uploads go to.
    pub bucket_id: String,
    /// The name of the bucket, used when building download URLs.
    pub bucket_name: String,
    /// Base URL of the authorization endpoint.
    pub auth_base_url: String,
}

impl StorageConfig {
    /// Creates a new `StorageConfig` instance from environment variables.
    ///
    /// Credentials default to empty strings so the server can boot without
    /// storage configured; storage routes will then fail at the provider.
    /// `B2_AUTH_BASE_URL` exists so tests can point the client at a local
    /// server.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        StorageConfig {
            key_id: env::var("B2_KEY_ID").unwrap_or_default(),
            application_key: env::var("B2_APPLICATION_KEY").unwrap_or_default(),
            bucket_id: env::var("B2_BUCKET_ID").unwrap_or_default(),
            bucket_name: env::var("B2_BUCKET_NAME").unwrap_or_default(),
            auth_base_url: env::var("B2_AUTH_BASE_URL")
                .unwrap_or_else(|_| "https://api.backblazeb2.com".to_string()),
        }
    }
}

#[derive(Clone, Debug)]
/// Stripe keys, price IDs and the redirect URLs used by checkout and the
/// billing portal.
pub struct StripeConfig {
    /// Stripe secret key
    pub secret_key: String,
    /// Stripe webhook signing secret
    pub webhook_secret: String,
    /// Price ID charged for the recurring subscription plan.
    pub price_id_subscription: String,
    /// Price ID charged for the one-time plan.
    pub price_id_single: String,
    /// Where Stripe redirects the customer after a completed checkout.
    pub success_url: String,
    /// Where Stripe redirects the customer after an abandoned checkout.
    pub cancel_url: String,
    /// Default return URL for billing portal sessions.
    pub portal_return_url: String,
}

impl StripeConfig {
    /// Creates a new `StripeConfig` instance from environment variables.
    ///
    /// Keys and price IDs default to empty strings; a checkout request that
    /// resolves to an empty price ID is rejected as a bad request rather
    /// than sent to Stripe.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        StripeConfig {
            secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
            price_id_subscription: env::var("STRIPE_PRICE_ID_SUBSCRIPTION").unwrap_or_default(),
            price_id_single: env::var("STRIPE_PRICE_ID_SINGLE").unwrap_or_default(),
            success_url: env::var("CHECKOUT_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:3000/success".to_string()),
            cancel_url: env::var("CHECKOUT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:3000/cancel".to_string()),
            portal_return_url: env::var("PORTAL_RETURN_URL")
                .unwrap_or_else(|_| "http://localhost:3000/account".to_string()),
        }
    }
}

#[derive(Clone, Debug)]
/// Key, endpoints and model names for the transcription and summarization
/// provider.
pub struct AiConfig {
    /// API key sent as a bearer token to both endpoints.
    pub api_key: String,
    /// Base URL of the transcription API.
    pub transcribe_base_url: String,
    /// Base URL of the chat completions API used for summaries.
    pub llm_base_url: String,
    /// Model used for audio transcription.
    pub transcribe_model: String,
    /// Model used for transcript summarization.
    pub summary_model: String,
}

impl AiConfig {
    /// Creates a new `AiConfig` instance from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        AiConfig {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            transcribe_base_url: env::var("TRANSCRIBE_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            transcribe_model: env::var("TRANSCRIBE_MODEL")
                .unwrap_or_else(|_| "whisper-1".to_string()),
            summary_model: env::var("SUMMARY_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        }
    }
}

#[derive(Clone, Debug)]
/// Key and sender address for the transactional email provider.
pub struct EmailConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// The From address stamped on every outgoing summary email.
    pub from_address: String,
    /// Base URL of the email API.
    pub base_url: String,
}

impl EmailConfig {
    /// Creates a new `EmailConfig` instance from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        EmailConfig {
            api_key: env::var("EMAIL_API_KEY").unwrap_or_default(),
            from_address: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "summaries@audibrief.local".to_string()),
            base_url: env::var("EMAIL_BASE_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// Loads all configuration values from environment variables with sensible
    /// defaults for most optional settings. This method initializes the complete
    /// server configuration including database connection, server parameters,
    /// and every provider client configuration.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: "development" or "production"
    /// - `DATABASE_URL`: Connection string for the database
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGINS`: Comma-separated allowed CORS origins
    ///   (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - Provider settings (see the provider config types for details)
    ///
    /// # Panics
    ///
    /// This function will panic if required environment variables are missing.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            storage: StorageConfig::from_env(),
            stripe: StripeConfig::from_env(),
            ai: AiConfig::from_env(),
            email: EmailConfig::from_env(),
        })
    }
}
