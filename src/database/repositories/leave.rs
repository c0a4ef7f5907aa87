use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{LeaveRequest, LeaveStatus, LeaveType};
use crate::error::AppError;

const LEAVE_COLUMNS: &str = r#"
    id, employee_id, leave_type, start_date, end_date, reason, status,
    applied_date, approved_by, approval_date, created_at, updated_at
"#;

#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// New requests always start out pending with the applied date fixed at
    /// creation time.
    pub async fn create(
        &self,
        employee_id: Uuid,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: String,
    ) -> Result<LeaveRequest, AppError> {
        let now = Utc::now();

        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            INSERT INTO
                leave_requests (
                    id, employee_id, leave_type, start_date, end_date, reason,
                    status, applied_date, created_at, updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $8, $8)
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(employee_id)
        .bind(leave_type)
        .bind(start_date)
        .bind(end_date)
        .bind(reason)
        .bind(LeaveStatus::Pending)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LeaveRequest>, AppError> {
        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Ledger query. `employee_ids = None` means unscoped; an empty slice
    /// matches nothing.
    pub async fn find(
        &self,
        employee_ids: Option<Vec<Uuid>>,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leave_requests
            WHERE
                ($1::uuid[] IS NULL OR employee_id = ANY($1))
                AND ($2::varchar IS NULL OR status = $2)
            ORDER BY applied_date DESC
            "#
        ))
        .bind(employee_ids)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Applies a status transition, recording who decided and when. Guarded
    /// on the expected current status so a racing transition loses cleanly;
    /// `None` means the row moved on (or never existed).
    pub async fn set_status(
        &self,
        id: Uuid,
        expected: LeaveStatus,
        next: LeaveStatus,
        approver_id: Uuid,
        decided_at: DateTime<Utc>,
    ) -> Result<Option<LeaveRequest>, AppError> {
        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            UPDATE leave_requests
            SET
                status = $3,
                approved_by = $4,
                approval_date = $5,
                updated_at = $5
            WHERE
                id = $1 AND status = $2
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected)
        .bind(next)
        .bind(approver_id)
        .bind(decided_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
