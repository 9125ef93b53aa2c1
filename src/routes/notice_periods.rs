use actix_web::web;

use crate::handlers::notice_periods;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notice-periods")
            .route("", web::post().to(notice_periods::create_notice_period))
            .route("/mine", web::get().to(notice_periods::my_notice_periods))
            .route("", web::get().to(notice_periods::list_notice_periods))
            .route("/{id}", web::get().to(notice_periods::get_notice_period))
            .route("/{id}", web::put().to(notice_periods::update_notice_period))
            .route(
                "/{id}",
                web::delete().to(notice_periods::delete_notice_period),
            ),
    );
}
