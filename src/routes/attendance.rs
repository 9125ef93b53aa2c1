use actix_web::web;

use crate::handlers::{attendance, leave};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("/clock-in", web::post().to(attendance::clock_in))
            .route("/clock-out", web::post().to(attendance::clock_out))
            .route("/my-attendance", web::get().to(attendance::my_attendance))
            .route("/leave", web::post().to(leave::apply_leave))
            .route("/my-leaves", web::get().to(leave::my_leaves))
            .route("/leaves", web::get().to(leave::all_leaves))
            .route("/leave/{id}", web::put().to(leave::decide_leave))
            .route("", web::get().to(attendance::all_attendance)),
    );
}
