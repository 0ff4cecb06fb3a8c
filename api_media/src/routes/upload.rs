use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use actix_web::{Responder, post, web};
use common::{
    error::{AppError, Res},
    http::Success,
};
use providers::ports::ObjectStorage;

use crate::dtos::media::UploadResponse;

#[derive(MultipartForm)]
pub struct UploadForm {
    #[multipart(rename = "file")]
    file: Vec<TempFile>,
}

/// Relays an uploaded audio file into object storage.
///
/// # Input
/// - multipart form with a single `file` field
///
/// # Output
/// - Success: 200 with `{"message": ..., "result": <provider payload>}`
/// - Error: 400 when the `file` field is missing, 500 when the provider
///   rejects the upload
#[post("/upload")]
async fn post_upload(
    MultipartForm(form): MultipartForm<UploadForm>,
    storage: web::Data<dyn ObjectStorage>,
) -> Res<impl Responder> {
    // The handle owns the on-disk temp file; it is unlinked when `file`
    // drops, whether the relay succeeded or not.
    let file = match form.file.into_iter().next() {
        Some(file) => file,
        None => return Err(AppError::BadRequest("File is required".to_string())),
    };

    let file_name = file
        .file_name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "upload.bin".to_string());

    let bytes = tokio::fs::read(file.file.path())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read uploaded file: {}", e)))?;

    log::info!("Relaying {} ({} bytes) to object storage", file_name, bytes.len());
    let result = storage.upload(file_name, bytes).await?;

    Success::ok(UploadResponse {
        message: "File uploaded successfully".to_string(),
        result,
    })
}
