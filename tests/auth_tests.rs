mod common;

use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serial_test::serial;

use common::{auth_header, TestApp};
use hrms_api::database::models::{AuthResponse, UserInfo, UserRole};
use hrms_api::handlers::shared::ApiResponse;

#[actix_rt::test]
#[serial]
async fn register_login_me_round_trip() {
    let Some(test_app) = TestApp::new().await else { return };
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "name": "Priya Nair",
            "email": "priya.nair@example.com",
            "password": "a-strong-password",
            "role": "hr_admin"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: ApiResponse<AuthResponse> = test::read_body_json(resp).await;
    let registered = body.data.unwrap();
    assert_eq!(registered.user.role, UserRole::HrAdmin);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "email": "priya.nair@example.com",
            "password": "a-strong-password"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ApiResponse<AuthResponse> = test::read_body_json(resp).await;
    let logged_in = body.data.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(auth_header(&logged_in.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ApiResponse<UserInfo> = test::read_body_json(resp).await;
    assert_eq!(body.data.unwrap().email, "priya.nair@example.com");
}

#[actix_rt::test]
#[serial]
async fn login_with_wrong_password_is_unauthorized() {
    let Some(test_app) = TestApp::new().await else { return };
    let app = test::init_service(test_app.create_app()).await;

    let (user, _) = test_app.seed_user(UserRole::Employee, None).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "email": user.email,
            "password": "not-the-password"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
#[serial]
async fn register_rejects_duplicate_email_and_bad_shape() {
    let Some(test_app) = TestApp::new().await else { return };
    let app = test::init_service(test_app.create_app()).await;

    let (user, _) = test_app.seed_user(UserRole::Employee, None).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "name": "Duplicate",
            "email": user.email,
            "password": "whatever"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "name": "Shapeless",
            "email": "not-an-email",
            "password": "whatever"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
#[serial]
async fn hr_admin_can_link_a_user_to_an_employee() {
    let Some(test_app) = TestApp::new().await else { return };
    let app = test::init_service(test_app.create_app()).await;

    let (_, admin_token) = test_app.seed_user(UserRole::HrAdmin, None).await;
    let (user, _) = test_app.seed_user(UserRole::Employee, None).await;
    let employee = test_app.seed_employee(None).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/auth/users/{}", user.id))
        .insert_header(auth_header(&admin_token))
        .set_json(serde_json::json!({ "employeeId": employee.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ApiResponse<UserInfo> = test::read_body_json(resp).await;
    assert_eq!(body.data.unwrap().employee_id, Some(employee.id));
}

#[actix_rt::test]
#[serial]
async fn user_listing_is_gated_to_elevated_roles() {
    let Some(test_app) = TestApp::new().await else { return };
    let app = test::init_service(test_app.create_app()).await;

    let (_, employee_token) = test_app.seed_user(UserRole::Employee, None).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/users")
        .insert_header(auth_header(&employee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
