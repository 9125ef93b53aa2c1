use actix_web::web;

use crate::handlers::auth;
use crate::middleware::{AuthRateLimiter, RateLimitStore};

pub fn configure(cfg: &mut web::ServiceConfig, login_rate_store: RateLimitStore) {
    cfg.service(
        web::scope("/auth")
            .service(
                // Login gets its own, much stricter window to slow down
                // credential stuffing.
                web::resource("/login")
                    .wrap(AuthRateLimiter::login(login_rate_store))
                    .route(web::post().to(auth::login)),
            )
            .route("/me", web::get().to(auth::me))
            .route("/all", web::get().to(auth::all_users))
            .route("/register", web::post().to(auth::register)),
    );
}
