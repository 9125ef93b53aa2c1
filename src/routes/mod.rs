use actix_web::web;

use crate::middleware::RateLimitStore;

pub mod admin;
pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod loans;
pub mod meetings;
pub mod notice_periods;
pub mod tasks;

pub fn configure(login_rate_store: RateLimitStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api")
                .configure(|scope| auth::configure(scope, login_rate_store))
                .configure(attendance::configure)
                .configure(announcements::configure)
                .configure(meetings::configure)
                .configure(tasks::configure)
                .configure(loans::configure)
                .configure(notice_periods::configure)
                .configure(admin::configure),
        );
    }
}
