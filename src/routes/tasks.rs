use actix_web::web;

use crate::handlers::tasks;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            .route("", web::post().to(tasks::create_task))
            .route("", web::get().to(tasks::list_tasks))
            .route("/my-tasks", web::get().to(tasks::my_tasks))
            .route("/{id}", web::get().to(tasks::get_task))
            .route("/{id}", web::put().to(tasks::update_task))
            .route("/{id}", web::delete().to(tasks::delete_task))
            .route("/{id}/comments", web::post().to(tasks::add_task_comment))
            .route("/{id}/comments", web::get().to(tasks::list_task_comments)),
    );
}
