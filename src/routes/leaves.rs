use actix_web::web;

use crate::handlers::leaves;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leaves")
            .route("", web::post().to(leaves::create_leave))
            .route("", web::get().to(leaves::get_leaves))
            .route("/{id}", web::get().to(leaves::get_leave))
            .route("/{id}/status", web::put().to(leaves::update_leave_status))
            .route("/{id}", web::delete().to(leaves::delete_leave)),
    );
}
