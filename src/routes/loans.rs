use actix_web::web;

use crate::handlers::loans;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/loans")
            .route("/apply", web::post().to(loans::apply_for_loan))
            .route("/my-loans", web::get().to(loans::my_loans))
            .route("/emi", web::get().to(loans::emi_quote))
            .route("", web::get().to(loans::list_loans))
            .route("/{id}/submit", web::post().to(loans::submit_loan))
            .route("/{id}/decision", web::put().to(loans::decide_loan))
            .route("/{id}/disburse", web::put().to(loans::disburse_loan)),
    );
}
