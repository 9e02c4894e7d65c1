use actix_multipart::form::MultipartForm;
use actix_web::{get, http::header, post, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::upload::ImageUpload,
    errors::AppError,
    handlers::json_response,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[post("/upload")]
#[instrument(skip(_claims, state, form))]
pub async fn upload_image(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<ImageUpload>,
) -> Result<impl Responder, AppError> {
    let image = state.image_store.save(form).await?;
    Ok(json_response::created(image))
}

#[get("/uploads/{file_name}")]
#[instrument(skip(state))]
pub async fn serve_upload(
    state: web::Data<AppState>,
    file_name: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let (bytes, mime_type) = state.image_store.open(&file_name).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, mime_type))
        .insert_header((header::CACHE_CONTROL, "public, max-age=31536000, immutable"))
        .body(bytes))
}
