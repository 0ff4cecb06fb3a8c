use actix_web::{Responder, get, web};
use common::{
    error::{AppError, Res},
    http::Success,
};
use providers::ports::ObjectStorage;

use crate::dtos::media::{DownloadQuery, SignedDownloadResponse};

/// Issues a short-lived grant for downloading a stored file.
///
/// # Input
/// - `fileName` query parameter, e.g. `/signed-download?fileName=lecture1.mp3`
///
/// # Output
/// - Success: 200 with `{"downloadUrl": ..., "authorizationHeader": ...}`
/// - Error: 400 when `fileName` is missing or empty
///
/// The caller passes `authorizationHeader` verbatim as the `Authorization`
/// header when fetching `downloadUrl`. The grant is never written to the
/// server logs.
#[get("/signed-download")]
async fn get_signed_download(
    query: web::Query<DownloadQuery>,
    storage: web::Data<dyn ObjectStorage>,
) -> Res<impl Responder> {
    let file_name = query.into_inner().file_name;
    if file_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "fileName query parameter is required".to_string(),
        ));
    }

    let grant = storage.signed_download(file_name).await?;

    Success::ok(SignedDownloadResponse {
        download_url: grant.download_url,
        authorization_header: grant.authorization,
    })
}
