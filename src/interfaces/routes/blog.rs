use actix_web::web;

use crate::handlers::blog_posts;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blog")
            .service(
                web::resource("")
                    .route(web::get().to(blog_posts::list_posts))
                    .route(web::post().to(blog_posts::create_post))
            )
            .service(
                web::resource("/{post_id}")
                    .route(web::get().to(blog_posts::get_post))
                    .route(web::put().to(blog_posts::replace_post))
                    .route(web::patch().to(blog_posts::patch_post))
                    .route(web::delete().to(blog_posts::delete_post))
            )
            .service(
                web::resource("/{post_id}/duplicate")
                    .route(web::post().to(blog_posts::duplicate_post))
            )
            .service(
                web::resource("/{post_id}/publish")
                    .route(web::post().to(blog_posts::publish_post))
            )
            .service(
                web::resource("/{post_id}/view")
                    .route(web::post().to(blog_posts::record_view))
            )
            .service(
                web::resource("/{post_id}/like")
                    .route(web::post().to(blog_posts::like_post))
            )
    );
}
