use actix_web::{web, HttpResponse, Result};

use crate::database::models::{LoginInput, RegisterInput, UpdateUserInput, UserInfo};
use crate::database::repositories::{EmployeeRepository, UserRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;
use crate::AppState;

pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<RegisterInput>,
) -> Result<HttpResponse> {
    let response = state.auth_service.register(input.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    let response = state.auth_service.login(input.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn me(claims: Claims, users: web::Data<UserRepository>) -> Result<HttpResponse> {
    let user = users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}

/// Identity listing for administrative screens.
pub async fn list_users(
    claims: Claims,
    users: web::Data<UserRepository>,
) -> Result<HttpResponse> {
    claims.require_manager_or_hr_admin()?;

    let users: Vec<UserInfo> = users
        .list_users()
        .await?
        .into_iter()
        .map(UserInfo::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

/// hr_admin: change an identity's role and/or its employee link.
pub async fn update_user(
    claims: Claims,
    users: web::Data<UserRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<uuid::Uuid>,
    input: web::Json<UpdateUserInput>,
) -> Result<HttpResponse> {
    claims.require_hr_admin()?;

    let user_id = path.into_inner();
    let input = input.into_inner();

    // The link must point at a real directory entry.
    if let Some(employee_id) = input.employee_id {
        employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
    }

    let user = users
        .update_role_and_link(user_id, input.role, input.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}
