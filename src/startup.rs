use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::{dev::Server, http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::{middlewares::auth::AuthMiddleware, routes::configure_routes, settings::AppConfig, AppState};

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

/// Binds the HTTP server to an already-open listener.
pub fn run(
    listener: TcpListener,
    config: &AppConfig,
    state: web::Data<AppState>,
) -> std::io::Result<Server> {
    let server_config = config.clone();
    let upload_max_bytes = config.upload_max_bytes;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(AuthMiddleware)
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&server_config))
            .wrap(TracingLogger::default())
            .configure(|cfg| configure_routes(cfg, upload_max_bytes))
    })
    .listen(listener)?
    .workers(config.worker_count.max(1))
    .run();

    Ok(server)
}
