use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::chat::ChatRequest,
    errors::AppError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Rate limited per client IP. Upstream failures still answer 200 with a
/// canned reply. The body is the bare `{response, message, fallback}`
/// object the chat widget reads, not the `data` envelope.
#[post("/portfolio-chat")]
#[instrument(skip(req, state, body), fields(history_len = body.history.len()))]
pub async fn portfolio_chat(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ChatRequest>,
) -> Result<impl Responder, AppError> {
    let client_ip = get_client_ip(&req, state.trust_x_forwarded_for);
    if let Err(retry_after_secs) = state.chat_limiter.check(&client_ip) {
        tracing::warn!(client_ip = %client_ip, retry_after_secs, "Chat rate limit exceeded");
        return Err(AppError::RateLimited { retry_after_secs });
    }

    let reply = state.chat_handler.reply(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reply))
}
