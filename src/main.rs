use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;

use hrms_api::database::{
    init_database,
    repositories::{AttendanceRepository, EmployeeRepository, LeaveRepository, UserRepository},
};
use hrms_api::middleware::RequestId;
use hrms_api::{routes, AppState, AuthService, Config};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("HRMS API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    println!("🚀 Starting HRMS API server...");

    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    let user_repository = UserRepository::new(pool.clone());
    let employee_repository = EmployeeRepository::new(pool.clone());
    let attendance_repository = AttendanceRepository::new(pool.clone());
    let leave_repository = LeaveRepository::new(pool.clone());
    let auth_service = AuthService::new(user_repository.clone(), config.clone());

    let app_state = web::Data::new(AppState { auth_service });
    let user_repo_data = web::Data::new(user_repository);
    let employee_repo_data = web::Data::new(employee_repository);
    let attendance_repo_data = web::Data::new(attendance_repository);
    let leave_repo_data = web::Data::new(leave_repository);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(user_repo_data.clone())
            .app_data(employee_repo_data.clone())
            .app_data(attendance_repo_data.clone())
            .app_data(leave_repo_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::api)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
