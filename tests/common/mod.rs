//! Shared fixtures for the integration suite.
//!
//! The suite needs a running PostgreSQL instance. Set `TEST_DATABASE_URL` to
//! point at one; when it is unset every test skips itself instead of failing.

#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header,
    web, App, Error,
};
use bcrypt::{hash, DEFAULT_COST};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

use hrms_api::database::models::{CreateEmployeeInput, Employee, User, UserRole};
use hrms_api::database::repositories::{
    AttendanceRepository, EmployeeRepository, LeaveRepository, UserRepository,
};
use hrms_api::database::init_database;
use hrms_api::{routes, AppState, AuthService, Config};

pub struct TestApp {
    pub pool: PgPool,
    pub config: Config,
}

impl TestApp {
    /// Connects to the test database, or returns `None` so the caller can
    /// skip when no database is available.
    pub async fn new() -> Option<Self> {
        let database_url = match env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("TEST_DATABASE_URL not set; skipping integration test");
                return None;
            }
        };

        let pool = init_database(&database_url)
            .await
            .expect("failed to initialize test database");

        // Each test starts from an empty ledger.
        sqlx::query(
            "TRUNCATE TABLE attendance_records, leave_requests, users, employees CASCADE",
        )
        .execute(&pool)
        .await
        .expect("failed to reset test database");

        let config = Config {
            database_url,
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
        };

        Some(TestApp { pool, config })
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = Error,
            InitError = (),
        >,
    > {
        let user_repository = UserRepository::new(self.pool.clone());
        let auth_service = AuthService::new(user_repository.clone(), self.config.clone());

        App::new()
            .app_data(web::Data::new(AppState { auth_service }))
            .app_data(web::Data::new(user_repository))
            .app_data(web::Data::new(EmployeeRepository::new(self.pool.clone())))
            .app_data(web::Data::new(AttendanceRepository::new(self.pool.clone())))
            .app_data(web::Data::new(LeaveRepository::new(self.pool.clone())))
            .app_data(web::Data::new(self.config.clone()))
            .configure(routes::api)
    }

    /// Inserts a user with the given role and optional employee link, and
    /// returns it with a valid bearer token.
    pub async fn seed_user(
        &self,
        role: UserRole,
        employee_id: Option<Uuid>,
    ) -> (User, String) {
        let repo = UserRepository::new(self.pool.clone());
        let auth = AuthService::new(repo.clone(), self.config.clone());

        let name: String = FirstName().fake();
        let email = format!("{}@example.com", Uuid::new_v4());
        let password_hash = hash("correct horse battery staple", DEFAULT_COST).unwrap();

        let mut user = User::new(name, email, password_hash, role);
        user.employee_id = employee_id;

        repo.create_user(&user).await.expect("failed to seed user");

        let token = auth.generate_token(&user).expect("failed to issue token");

        (user, token)
    }

    pub async fn seed_employee(&self, manager_id: Option<Uuid>) -> Employee {
        let repo = EmployeeRepository::new(self.pool.clone());

        let input = CreateEmployeeInput {
            employee_code: format!("EMP-{}", Uuid::new_v4()),
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            email: format!("{}@example.com", Uuid::new_v4()),
            phone: None,
            date_of_joining: NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(),
            department: "Engineering".to_string(),
            designation: "Developer".to_string(),
            salary: BigDecimal::from(60_000),
            manager_id,
        };

        repo.create(input).await.expect("failed to seed employee")
    }
}

pub fn auth_header(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
