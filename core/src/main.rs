mod cors;

use std::sync::Arc;

use actix_web::{App, HttpServer, get, web};
use common::env_config::Config;
use db::subscriptions::{PgSubscriptionStore, SubscriptionStore};
use providers::{
    email::HttpEmailSender,
    payments::StripeGateway,
    ports::{EmailSender, ObjectStorage, PaymentGateway, Summarizer, Transcriber},
    storage::B2Storage,
    summarize::ChatSummarizer,
    transcribe::WhisperTranscriber,
};

#[get("/")]
async fn index() -> &'static str {
    "audibrief is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.environment == "production";
    let origins = config.cors_allowed_origins.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // outbound providers, injected as trait objects so routes stay
    // independent of the concrete clients
    let storage: Arc<dyn ObjectStorage> = Arc::new(B2Storage::new(config.storage.clone()));
    let gateway: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(config.stripe.clone()));
    let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperTranscriber::new(config.ai.clone()));
    let summarizer: Arc<dyn Summarizer> = Arc::new(ChatSummarizer::new(config.ai.clone()));
    let mailer: Arc<dyn EmailSender> = Arc::new(HttpEmailSender::new(config.email.clone()));
    let subscriptions: Arc<dyn SubscriptionStore> =
        Arc::new(PgSubscriptionStore::new(pool.clone()));

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::from(storage.clone()))
            .app_data(web::Data::from(gateway.clone()))
            .app_data(web::Data::from(transcriber.clone()))
            .app_data(web::Data::from(summarizer.clone()))
            .app_data(web::Data::from(mailer.clone()))
            .app_data(web::Data::from(subscriptions.clone()))
            .wrap(logger::middleware())
            .wrap(cors::middleware(&origins))
            .service(index)
            .configure(api_media::mount)
            .configure(api_billing::mount)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
