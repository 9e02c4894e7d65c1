use actix_web::web;

use crate::handlers::{home::home, uploads::serve_upload};

mod blog;
mod json_error;
mod projects;
mod system;

pub use json_error::JsonError;

pub fn configure_routes(cfg: &mut web::ServiceConfig, upload_max_bytes: usize) {
    json_error::config_routes(cfg, upload_max_bytes);

    cfg.service(home).service(serve_upload);

    cfg.service(
        web::scope("/api")
            .configure(system::config_routes)
            .configure(projects::config_routes)
            .configure(blog::config_routes)
    );
}
