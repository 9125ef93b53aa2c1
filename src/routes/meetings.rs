use actix_web::web;

use crate::handlers::meetings;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/meetings")
            .route("", web::post().to(meetings::create_meeting))
            .route("", web::get().to(meetings::list_meetings))
            .route("/{id}", web::get().to(meetings::get_meeting))
            .route("/{id}", web::put().to(meetings::update_meeting))
            .route("/{id}", web::delete().to(meetings::delete_meeting)),
    );
}
