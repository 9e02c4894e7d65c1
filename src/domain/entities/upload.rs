use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use serde::Serialize;

#[derive(Debug, MultipartForm)]
pub struct ImageUpload {
    #[multipart(rename = "file")]
    pub file: TempFile,

    #[multipart(rename = "altText")]
    pub alt_text: Option<Text<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    pub image_url: String,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}
