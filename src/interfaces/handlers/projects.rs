use actix_web::{web, Either, Responder};
use tracing::instrument;

use crate::{
    entities::project::{NewProject, ProjectPatch},
    errors::AppError,
    handlers::json_response,
    use_cases::{extractors::AdminClaims, forms::ProjectForm, listing::ListingParams},
    AppState,
};

/// JSON body or an admin HTML form post.
pub type ProjectPayload = Either<web::Json<NewProject>, web::Form<ProjectForm>>;

fn into_new_project(payload: ProjectPayload) -> Result<NewProject, AppError> {
    match payload {
        Either::Left(json) => Ok(json.into_inner()),
        Either::Right(form) => form.into_inner().into_payload(),
    }
}

#[instrument(skip(state))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<ListingParams>,
) -> Result<impl Responder, AppError> {
    let page = state.project_handler.list_projects(&query).await?;
    Ok(json_response::paged(page))
}

#[instrument(skip(state))]
pub async fn get_project(
    state: web::Data<AppState>,
    project_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;
    Ok(json_response::ok(project))
}

#[instrument(skip(_claims, state, payload))]
pub async fn create_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    payload: ProjectPayload,
) -> Result<impl Responder, AppError> {
    let new = into_new_project(payload)?;
    let project = state.project_handler.create_project(new).await?;
    Ok(json_response::created(project))
}

#[instrument(skip(_claims, state, payload))]
pub async fn replace_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    project_id: web::Path<String>,
    payload: ProjectPayload,
) -> Result<impl Responder, AppError> {
    let new = into_new_project(payload)?;
    let project = state.project_handler.replace_project(&project_id, new).await?;
    Ok(json_response::ok(project))
}

#[instrument(skip(_claims, state, patch))]
pub async fn patch_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    project_id: web::Path<String>,
    patch: web::Json<ProjectPatch>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .patch_project(&project_id, patch.into_inner())
        .await?;
    Ok(json_response::ok(project))
}

#[instrument(skip(_claims, state))]
pub async fn duplicate_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    project_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let copy = state.project_handler.duplicate_project(&project_id).await?;
    Ok(json_response::created(copy))
}

#[instrument(skip(_claims, state))]
pub async fn delete_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    project_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete_project(&project_id).await?;
    Ok(json_response::deleted())
}
