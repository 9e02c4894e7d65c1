use actix_web::web;

use crate::handlers::{chat, system, tags, uploads, users};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(system::health_check)
        .service(users::me)
        .service(tags::list_tags)
        .service(chat::portfolio_chat)
        .service(uploads::upload_image);
}
