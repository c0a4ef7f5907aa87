use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{
    derive_manual_entry, hours_between, round_hours, AttendanceQuery, AttendanceStatus,
    ManualAttendanceInput,
};
use crate::database::repositories::{AttendanceRepository, EmployeeRepository, UserRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{access, Claims};

/// Self-service check-in for the caller's linked employee profile.
pub async fn check_in(
    claims: Claims,
    users: web::Data<UserRepository>,
    attendance: web::Data<AttendanceRepository>,
) -> Result<HttpResponse> {
    let employee_id = access::linked_employee_id(&claims, &users).await?;

    let now = Utc::now();
    let today = now.date_naive();

    let record = attendance
        .check_in(employee_id, today, now)
        .await?
        .ok_or_else(|| AppError::Conflict("Already checked in for today".to_string()))?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(record),
        "Check-in successful",
    )))
}

pub async fn check_out(
    claims: Claims,
    users: web::Data<UserRepository>,
    attendance: web::Data<AttendanceRepository>,
) -> Result<HttpResponse> {
    let employee_id = access::linked_employee_id(&claims, &users).await?;

    let now = Utc::now();
    let today = now.date_naive();

    let record = attendance
        .find_for_day(employee_id, today)
        .await?
        .ok_or_else(|| AppError::Conflict("No check-in record found for today".to_string()))?;

    if record.check_out_time.is_some() {
        return Err(AppError::Conflict("Already checked out for today".to_string()).into());
    }

    let check_in_time = record.check_in_time.ok_or_else(|| {
        AppError::Conflict("Cannot check out without a check-in time".to_string())
    })?;

    // Status is derived from the exact duration; the stored value is rounded.
    let hours = hours_between(check_in_time, now);
    let status = AttendanceStatus::for_hours_worked(hours);

    let record = attendance
        .complete_check_out(record.id, now, round_hours(hours), status)
        .await?
        .ok_or_else(|| AppError::Conflict("Already checked out for today".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(record),
        "Check-out successful",
    )))
}

/// Attendance ledger, narrowed to what the caller's role may see.
pub async fn get_attendance(
    claims: Claims,
    users: web::Data<UserRepository>,
    employees: web::Data<EmployeeRepository>,
    attendance: web::Data<AttendanceRepository>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse> {
    let scope = access::resolve_scope(&claims, &users).await?;
    let employee_ids =
        access::scoped_employee_ids(&scope, query.employee_id, &employees).await?;

    let records = attendance
        .find(employee_ids, query.start_date, query.end_date)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

pub async fn get_employee_attendance(
    claims: Claims,
    users: web::Data<UserRepository>,
    employees: web::Data<EmployeeRepository>,
    attendance: web::Data<AttendanceRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let scope = access::resolve_scope(&claims, &users).await?;
    let employee_ids =
        access::scoped_employee_ids(&scope, Some(path.into_inner()), &employees).await?;

    let records = attendance.find(employee_ids, None, None).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

/// hr_admin: create or correct a day's record. The (employee, day) unique
/// key makes this an update-in-place when the row already exists.
pub async fn manual_entry(
    claims: Claims,
    employees: web::Data<EmployeeRepository>,
    attendance: web::Data<AttendanceRepository>,
    input: web::Json<ManualAttendanceInput>,
) -> Result<HttpResponse> {
    claims.require_hr_admin()?;

    let input = input.into_inner();

    employees
        .find_by_id(input.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    let (hours_worked, status) =
        derive_manual_entry(input.check_in_time, input.check_out_time, input.status)?;

    let day = input.date.date_naive();

    let record = attendance
        .manual_upsert(
            input.employee_id,
            day,
            input.check_in_time,
            input.check_out_time,
            hours_worked,
            status,
            input.notes,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(record),
        "Attendance updated successfully",
    )))
}

pub async fn delete_attendance(
    claims: Claims,
    attendance: web::Data<AttendanceRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    claims.require_hr_admin()?;

    if !attendance.delete(path.into_inner()).await? {
        return Err(AppError::NotFound("Attendance record not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("Attendance record deleted")))
}
