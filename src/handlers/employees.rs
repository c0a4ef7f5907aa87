use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::database::models::{CreateEmployeeInput, UpdateEmployeeInput};
use crate::database::repositories::{EmployeeRepository, UserRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{access, Claims};

/// Directory listing. Plain employees are denied outright; they read their
/// own profile through the by-id route.
pub async fn list_employees(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
) -> Result<HttpResponse> {
    claims.require_manager_or_hr_admin()?;

    let employees = employees.list_active().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(employees)))
}

pub async fn get_employee(
    claims: Claims,
    users: web::Data<UserRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let employee_id = path.into_inner();

    let employee = employees
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    if claims.is_employee() {
        let own_id = access::linked_employee_id(&claims, &users).await?;
        if own_id != employee_id {
            return Err(AppError::Forbidden(
                "Not authorized to view this employee profile".to_string(),
            )
            .into());
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(employee)))
}

pub async fn create_employee(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<CreateEmployeeInput>,
) -> Result<HttpResponse> {
    claims.require_hr_admin()?;

    let employee = employees.create(input.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(employee)))
}

pub async fn update_employee(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateEmployeeInput>,
) -> Result<HttpResponse> {
    claims.require_hr_admin()?;

    let employee = employees
        .update(path.into_inner(), input.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(employee)))
}

/// DELETE is a status transition to `terminated`; attendance and leave
/// history keep their employee reference.
pub async fn delete_employee(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    claims.require_hr_admin()?;

    let employee = employees
        .terminate(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(employee),
        "Employee removed (status set to terminated)",
    )))
}
