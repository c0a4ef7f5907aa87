use actix_web::web;

pub mod attendance;
pub mod auth;
pub mod employees;
pub mod leaves;

/// Mounts the whole API under /api/v1. Shared between the server binary and
/// the integration tests.
pub fn api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(auth::configure)
            .configure(employees::configure)
            .configure(attendance::configure)
            .configure(leaves::configure),
    );
}
