use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::db_enum;
use crate::error::AppError;

/// Worked-duration policy boundaries, in hours. Both bounds are inclusive on
/// the lower side: exactly 4.0h is a half day, exactly 8.0h is a full day.
pub const HALF_DAY_HOURS: f64 = 4.0;
pub const FULL_DAY_HOURS: f64 = 8.0;

db_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "kebab-case")]
    pub enum AttendanceStatus {
        Present => "present",
        Absent => "absent",
        HalfDay => "half-day",
        PartialPresent => "partial-present",
        PartialEntry => "partial-entry",
        Leave => "leave",
    }
}

impl AttendanceStatus {
    /// Maps a worked duration onto a status. Callers must pass the exact
    /// duration, not the 2-decimal value stored on the record, so that the
    /// policy boundaries stay exact.
    pub fn for_hours_worked(hours: f64) -> Self {
        if hours >= FULL_DAY_HOURS {
            AttendanceStatus::Present
        } else if hours >= HALF_DAY_HOURS {
            AttendanceStatus::HalfDay
        } else {
            AttendanceStatus::PartialPresent
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// Calendar-day key; together with `employee_id` this is unique.
    pub day: NaiveDate,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    /// Derived from the two timestamps, never taken from caller input.
    pub hours_worked: f64,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAttendanceInput {
    pub employee_id: Uuid,
    /// Any timestamp within the intended day; normalized to the day key.
    pub date: DateTime<Utc>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub employee_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub fn hours_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> f64 {
    (check_out - check_in).num_seconds() as f64 / 3600.0
}

/// Stored hours carry two decimals, matching what the directory UI shows.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// Derives (hours_worked, status) for a manual entry. Both timestamps yield
/// a recomputed duration and force `present` unless an explicit override is
/// supplied; a single timestamp is a `partial-entry` unless overridden.
pub fn derive_manual_entry(
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
    status_override: Option<AttendanceStatus>,
) -> Result<(f64, AttendanceStatus), AppError> {
    match (check_in, check_out) {
        (Some(cin), Some(cout)) => {
            if cout < cin {
                return Err(AppError::BadRequest(
                    "Check-out time cannot be before check-in time".to_string(),
                ));
            }
            let hours = hours_between(cin, cout);
            let status = status_override.unwrap_or(AttendanceStatus::Present);
            Ok((round_hours(hours), status))
        }
        (Some(_), None) | (None, Some(_)) => {
            Ok((0.0, status_override.unwrap_or(AttendanceStatus::PartialEntry)))
        }
        (None, None) => Ok((0.0, status_override.unwrap_or(AttendanceStatus::Absent))),
    }
}
