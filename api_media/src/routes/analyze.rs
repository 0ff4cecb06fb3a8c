use actix_web::{Responder, post, web};
use common::{
    error::{AppError, Res},
    http::Success,
};
use providers::ports::{EmailSender, ObjectStorage, Summarizer, Transcriber};

use crate::{
    dtos::media::{AnalyzeRequest, AnalyzeResponse},
    services::analyze,
};

/// Runs the full analysis pipeline for a stored audio file.
///
/// Fetches the file from object storage, transcribes it, summarizes the
/// transcript and emails the summary to the caller. The response carries
/// only a short preview; the full summary arrives by email.
///
/// # Input
/// ```json
/// {
///     "fileName": "lecture1.mp3",
///     "email": "student@example.com"
/// }
/// ```
///
/// # Output
/// - Success: 200 with `{"message": ..., "fileName": ..., "email": ..., "sample": ...}`
/// - Error: 400 when `fileName` or `email` is missing, 500 when any
///   pipeline stage fails
#[post("/analyze")]
async fn post_analyze(
    req: web::Json<AnalyzeRequest>,
    storage: web::Data<dyn ObjectStorage>,
    transcriber: web::Data<dyn Transcriber>,
    summarizer: web::Data<dyn Summarizer>,
    mailer: web::Data<dyn EmailSender>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    if req.file_name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::BadRequest(
            "fileName and email are required".to_string(),
        ));
    }

    let outcome = analyze::run(
        storage.get_ref(),
        transcriber.get_ref(),
        summarizer.get_ref(),
        mailer.get_ref(),
        &req.file_name,
        &req.email,
    )
    .await?;

    Success::ok(AnalyzeResponse {
        message: "Analysis complete, summary emailed".to_string(),
        file_name: req.file_name,
        email: req.email,
        sample: outcome.summary_preview,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use providers::ports::{
        MockEmailSender, MockObjectStorage, MockSummarizer, MockTranscriber,
    };

    use super::*;

    struct Ports {
        storage: MockObjectStorage,
        transcriber: MockTranscriber,
        summarizer: MockSummarizer,
        mailer: MockEmailSender,
    }

    impl Ports {
        fn new() -> Self {
            Self {
                storage: MockObjectStorage::new(),
                transcriber: MockTranscriber::new(),
                summarizer: MockSummarizer::new(),
                mailer: MockEmailSender::new(),
            }
        }
    }

    async fn send(ports: Ports, body: serde_json::Value) -> actix_web::dev::ServiceResponse {
        let storage: Arc<dyn ObjectStorage> = Arc::new(ports.storage);
        let transcriber: Arc<dyn Transcriber> = Arc::new(ports.transcriber);
        let summarizer: Arc<dyn Summarizer> = Arc::new(ports.summarizer);
        let mailer: Arc<dyn EmailSender> = Arc::new(ports.mailer);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(storage))
                .app_data(web::Data::from(transcriber))
                .app_data(web::Data::from(summarizer))
                .app_data(web::Data::from(mailer))
                .service(post_analyze),
        )
        .await;

        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/analyze")
                .set_json(body)
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn completed_analysis_reports_a_preview() {
        let mut ports = Ports::new();
        ports
            .storage
            .expect_fetch()
            .withf(|file_name| file_name == "lecture1.mp3")
            .times(1)
            .returning(|_| Ok(b"ID3fakeaudio".to_vec()));
        ports
            .transcriber
            .expect_transcribe()
            .times(1)
            .returning(|_, _| Ok("the raw transcript".to_string()));
        ports
            .summarizer
            .expect_summarize()
            .times(1)
            .returning(|_| Ok("Key points from the lecture.".to_string()));
        ports
            .mailer
            .expect_send_html()
            .withf(|email| email.to == "student@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let resp = send(
            ports,
            serde_json::json!({"fileName": "lecture1.mp3", "email": "student@example.com"}),
        )
        .await;

        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Analysis complete, summary emailed");
        assert_eq!(body["fileName"], "lecture1.mp3");
        assert_eq!(body["email"], "student@example.com");
        assert_eq!(body["sample"], "Key points from the lecture.");
    }

    #[actix_web::test]
    async fn missing_fields_are_a_bad_request() {
        let mut ports = Ports::new();
        ports.storage.expect_fetch().times(0);

        let resp = send(ports, serde_json::json!({"fileName": "lecture1.mp3"})).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("email"));
    }

    #[actix_web::test]
    async fn stage_failure_maps_to_500_and_no_email_goes_out() {
        let mut ports = Ports::new();
        ports
            .storage
            .expect_fetch()
            .returning(|_| Ok(b"ID3fakeaudio".to_vec()));
        ports.transcriber.expect_transcribe().returning(|_, _| {
            Err(AppError::Upstream(
                "transcription failed: 500: model overloaded".to_string(),
            ))
        });
        ports.summarizer.expect_summarize().times(0);
        ports.mailer.expect_send_html().times(0);

        let resp = send(
            ports,
            serde_json::json!({"fileName": "lecture1.mp3", "email": "student@example.com"}),
        )
        .await;

        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("transcription"));
    }
}
