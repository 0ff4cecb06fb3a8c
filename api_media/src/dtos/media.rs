use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    /// Raw payload the storage provider returned for the stored file.
    pub result: serde_json::Value,
}

#[derive(Deserialize)]
pub struct DownloadQuery {
    // Defaulted so a missing parameter surfaces as our own 400, not the
    // extractor's.
    #[serde(rename = "fileName", default)]
    pub file_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedDownloadResponse {
    pub download_url: String,
    pub authorization_header: String,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "fileName", default)]
    pub file_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub message: String,
    pub file_name: String,
    pub email: String,
    /// First ~300 characters of the generated summary.
    pub sample: String,
}
