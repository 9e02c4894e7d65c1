use actix_web::{web, Either, Responder};
use tracing::instrument;

use crate::{
    entities::blog_post::{BlogPostPatch, NewBlogPost},
    errors::AppError,
    handlers::json_response,
    use_cases::{extractors::AdminClaims, forms::BlogPostForm, listing::ListingParams},
    AppState,
};

pub type BlogPostPayload = Either<web::Json<NewBlogPost>, web::Form<BlogPostForm>>;

fn into_new_post(payload: BlogPostPayload) -> NewBlogPost {
    match payload {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner().into_payload(),
    }
}

/// Drafts are listed only for admins passing `drafts=true`.
#[instrument(skip(state, admin))]
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListingParams>,
    admin: Option<AdminClaims>,
) -> Result<impl Responder, AppError> {
    let page = state.blog_handler.list_posts(&query, admin.is_some()).await?;
    Ok(json_response::paged(page))
}

#[instrument(skip(state, admin))]
pub async fn get_post(
    state: web::Data<AppState>,
    id_or_slug: web::Path<String>,
    admin: Option<AdminClaims>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.get_post(&id_or_slug, admin.is_some()).await?;
    Ok(json_response::ok(post))
}

#[instrument(skip(_claims, state, payload))]
pub async fn create_post(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    payload: BlogPostPayload,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.create_post(into_new_post(payload)).await?;
    Ok(json_response::created(post))
}

#[instrument(skip(_claims, state, payload))]
pub async fn replace_post(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    post_id: web::Path<String>,
    payload: BlogPostPayload,
) -> Result<impl Responder, AppError> {
    let post = state
        .blog_handler
        .replace_post(&post_id, into_new_post(payload))
        .await?;
    Ok(json_response::ok(post))
}

#[instrument(skip(_claims, state, patch))]
pub async fn patch_post(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    post_id: web::Path<String>,
    patch: web::Json<BlogPostPatch>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.patch_post(&post_id, patch.into_inner()).await?;
    Ok(json_response::ok(post))
}

#[instrument(skip(_claims, state))]
pub async fn publish_post(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.publish_post(&post_id).await?;
    Ok(json_response::ok(post))
}

#[instrument(skip(_claims, state))]
pub async fn duplicate_post(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let copy = state.blog_handler.duplicate_post(&post_id).await?;
    Ok(json_response::created(copy))
}

#[instrument(skip(state))]
pub async fn record_view(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.record_view(&post_id).await?;
    Ok(json_response::ok(post))
}

#[instrument(skip(state))]
pub async fn like_post(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.like_post(&post_id).await?;
    Ok(json_response::ok(post))
}

#[instrument(skip(_claims, state))]
pub async fn delete_post(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.blog_handler.delete_post(&post_id).await?;
    Ok(json_response::deleted())
}
