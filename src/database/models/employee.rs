use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::db_enum;

db_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum EmployeeStatus {
        Active => "active",
        OnLeave => "on_leave",
        Terminated => "terminated",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    /// Human-facing employee number, unique across the directory.
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_joining: NaiveDate,
    pub department: String,
    pub designation: String,
    pub salary: BigDecimal,
    pub status: EmployeeStatus,
    /// The manager is an identity reference (users.id), applied uniformly
    /// wherever direct-report scoping is computed.
    pub manager_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeInput {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_joining: NaiveDate,
    pub department: String,
    pub designation: String,
    pub salary: BigDecimal,
    pub manager_id: Option<Uuid>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub salary: Option<BigDecimal>,
    pub status: Option<EmployeeStatus>,
    pub manager_id: Option<Uuid>,
}
