use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{LeaveQuery, LeaveRequestInput, LeaveStatusInput};
use crate::database::repositories::{EmployeeRepository, LeaveRepository, UserRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{access, Claims};

/// Apply for leave: employees for themselves, hr_admins on anyone's behalf.
pub async fn create_leave(
    claims: Claims,
    users: web::Data<UserRepository>,
    employees: web::Data<EmployeeRepository>,
    leaves: web::Data<LeaveRepository>,
    input: web::Json<LeaveRequestInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();

    // Every rule is checked before anything is written.
    if input.start_date > input.end_date {
        return Err(AppError::BadRequest(
            "Start date must be on or before end date".to_string(),
        )
        .into());
    }

    let employee_id = if claims.is_hr_admin() {
        let employee_id = input
            .employee_id
            .ok_or_else(|| AppError::BadRequest("Employee ID is required".to_string()))?;
        employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
        employee_id
    } else {
        let own_id = access::linked_employee_id(&claims, &users).await?;
        if input.employee_id.is_some_and(|id| id != own_id) {
            return Err(AppError::Forbidden(
                "Cannot apply for leave on behalf of another employee".to_string(),
            )
            .into());
        }
        own_id
    };

    let request = leaves
        .create(
            employee_id,
            input.leave_type,
            input.start_date,
            input.end_date,
            input.reason,
        )
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(request)))
}

/// Leave ledger, narrowed to what the caller's role may see.
pub async fn get_leaves(
    claims: Claims,
    users: web::Data<UserRepository>,
    employees: web::Data<EmployeeRepository>,
    leaves: web::Data<LeaveRepository>,
    query: web::Query<LeaveQuery>,
) -> Result<HttpResponse> {
    let scope = access::resolve_scope(&claims, &users).await?;
    let employee_ids = access::scoped_employee_ids(&scope, None, &employees).await?;

    let requests = leaves.find(employee_ids, query.status).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(requests)))
}

pub async fn get_leave(
    claims: Claims,
    users: web::Data<UserRepository>,
    employees: web::Data<EmployeeRepository>,
    leaves: web::Data<LeaveRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let request = leaves
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Leave request not found".to_string()))?;

    let scope = access::resolve_scope(&claims, &users).await?;

    let owner = employees
        .find_by_id(request.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    if !scope.allows(&owner) {
        return Err(AppError::Forbidden(
            "Not authorized to view this leave request".to_string(),
        )
        .into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
}

/// Approve / reject / cancel. hr_admins decide on any request, managers only
/// on their direct reports'.
pub async fn update_leave_status(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
    leaves: web::Data<LeaveRepository>,
    path: web::Path<Uuid>,
    input: web::Json<LeaveStatusInput>,
) -> Result<HttpResponse> {
    claims.require_manager_or_hr_admin()?;

    let leave_id = path.into_inner();
    let next = input.into_inner().status;

    let request = leaves
        .find_by_id(leave_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Leave request not found".to_string()))?;

    if claims.is_manager() {
        let owner = employees
            .find_by_id(request.employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        if owner.manager_id != Some(claims.sub) {
            return Err(AppError::Forbidden(
                "Not authorized to decide on this leave request".to_string(),
            )
            .into());
        }
    }

    if !request.status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "Invalid transition from {} to {}",
            request.status, next
        ))
        .into());
    }

    // The update is guarded on the status we just validated, so a racing
    // transition surfaces as a conflict instead of a double decision.
    let request = leaves
        .set_status(leave_id, request.status, next, claims.sub, Utc::now())
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Leave request was updated concurrently".to_string())
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
}

pub async fn delete_leave(
    claims: Claims,
    leaves: web::Data<LeaveRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    claims.require_hr_admin()?;

    if !leaves.delete(path.into_inner()).await? {
        return Err(AppError::NotFound("Leave request not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("Leave request deleted")))
}
