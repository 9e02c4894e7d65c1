use actix_web::{get, web, Responder};
use tracing::instrument;

use crate::{errors::AppError, handlers::json_response, AppState};

#[get("/tags")]
#[instrument(skip(state))]
pub async fn list_tags(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let tags = state.tag_handler.top_tags().await?;
    Ok(json_response::ok(tags))
}
