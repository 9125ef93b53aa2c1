use actix_web::web;

use crate::handlers::announcements;
use crate::middleware::{CacheLayer, ResponseCacheMiddleware};

pub fn configure(cfg: &mut web::ServiceConfig) {
    let cache_layer = CacheLayer::new(1000, 120);
    cfg.service(
        web::scope("/announcements")
            .wrap(ResponseCacheMiddleware::new(cache_layer))
            .route("", web::get().to(announcements::list_announcements))
            .route(
                "/search/{query}",
                web::get().to(announcements::search_announcements),
            )
            .route("/{id}", web::get().to(announcements::get_announcement))
            .route("", web::post().to(announcements::create_announcement))
            .route("/{id}", web::put().to(announcements::update_announcement))
            .route(
                "/{id}",
                web::delete().to(announcements::delete_announcement),
            ),
    );
}
