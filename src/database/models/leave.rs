use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::db_enum;

db_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum LeaveType {
        Casual => "casual",
        Sick => "sick",
        Earned => "earned",
        Maternity => "maternity",
        Paternity => "paternity",
        Bereavement => "bereavement",
        Other => "other",
    }
}

impl Default for LeaveType {
    fn default() -> Self {
        LeaveType::Casual
    }
}

db_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum LeaveStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

impl LeaveStatus {
    /// The full transition table: a pending request can be approved,
    /// rejected or cancelled; an approved request can still be cancelled.
    /// Everything else is illegal.
    pub fn can_transition_to(&self, next: LeaveStatus) -> bool {
        match (self, next) {
            (LeaveStatus::Pending, LeaveStatus::Approved)
            | (LeaveStatus::Pending, LeaveStatus::Rejected)
            | (LeaveStatus::Pending, LeaveStatus::Cancelled)
            | (LeaveStatus::Approved, LeaveStatus::Cancelled) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    /// Fixed at creation; never updated afterwards.
    pub applied_date: DateTime<Utc>,
    pub approved_by: Option<Uuid>,
    pub approval_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestInput {
    /// Who the leave is for. Ignored for plain employees, who can only
    /// apply for themselves.
    pub employee_id: Option<Uuid>,
    #[serde(default)]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct LeaveStatusInput {
    pub status: LeaveStatus,
}

#[derive(Debug, Deserialize)]
pub struct LeaveQuery {
    pub status: Option<LeaveStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_reach_every_terminal_state() {
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Approved));
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Rejected));
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Cancelled));
    }

    #[test]
    fn approved_can_only_be_cancelled() {
        assert!(LeaveStatus::Approved.can_transition_to(LeaveStatus::Cancelled));
        assert!(!LeaveStatus::Approved.can_transition_to(LeaveStatus::Approved));
        assert!(!LeaveStatus::Approved.can_transition_to(LeaveStatus::Rejected));
        assert!(!LeaveStatus::Approved.can_transition_to(LeaveStatus::Pending));
    }

    #[test]
    fn self_transitions_and_reopening_are_illegal() {
        assert!(!LeaveStatus::Pending.can_transition_to(LeaveStatus::Pending));
        assert!(!LeaveStatus::Rejected.can_transition_to(LeaveStatus::Approved));
        assert!(!LeaveStatus::Rejected.can_transition_to(LeaveStatus::Cancelled));
        assert!(!LeaveStatus::Cancelled.can_transition_to(LeaveStatus::Pending));
        assert!(!LeaveStatus::Cancelled.can_transition_to(LeaveStatus::Approved));
    }
}
