use actix_web::{get, Responder};
use tracing::instrument;

use crate::{
    entities::token::ProfileResponse,
    handlers::json_response,
    use_cases::extractors::AuthClaims,
};

/// The caller's own token claims.
#[get("/me")]
#[instrument(skip(claims), fields(sub = %claims.0.sub))]
pub async fn me(claims: AuthClaims) -> impl Responder {
    json_response::ok(ProfileResponse::from(&claims.0))
}
