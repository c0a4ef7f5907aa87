use actix_web::web;

use crate::handlers::attendance;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("/check-in", web::post().to(attendance::check_in))
            .route("/check-out", web::post().to(attendance::check_out))
            .route("", web::get().to(attendance::get_attendance))
            .route(
                "/employee/{id}",
                web::get().to(attendance::get_employee_attendance),
            )
            .route("/manual", web::post().to(attendance::manual_entry))
            .route("/{id}", web::delete().to(attendance::delete_attendance)),
    );
}
