use actix_web::web;

use crate::handlers::admin;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin").route("/activity", web::get().to(admin::activity_feed)),
    );
}
