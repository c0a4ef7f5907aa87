use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{AttendanceRecord, AttendanceStatus};
use crate::error::AppError;

const ATTENDANCE_COLUMNS: &str = r#"
    id, employee_id, day, check_in_time, check_out_time, hours_worked,
    status, notes, created_at, updated_at
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a check-in for (employee, day) in a single atomic statement.
    ///
    /// The (employee_id, day) unique index is the race guard: a fresh row is
    /// inserted, or a manually-seeded row without a check-in is claimed. When
    /// the day's row already carries a check-in the `WHERE` arm of the upsert
    /// matches nothing and `None` comes back, which callers surface as the
    /// "already checked in" conflict.
    pub async fn check_in(
        &self,
        employee_id: Uuid,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            INSERT INTO
                attendance_records (
                    id, employee_id, day, check_in_time, hours_worked,
                    status, created_at, updated_at
                )
            VALUES
                ($1, $2, $3, $4, 0, $5, $6, $6)
            ON CONFLICT (employee_id, day) DO UPDATE
            SET
                check_in_time = EXCLUDED.check_in_time,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            WHERE
                attendance_records.check_in_time IS NULL
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(employee_id)
        .bind(day)
        .bind(now)
        .bind(AttendanceStatus::Present)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find_for_day(
        &self,
        employee_id: Uuid,
        day: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance_records
            WHERE employee_id = $1 AND day = $2
            "#
        ))
        .bind(employee_id)
        .bind(day)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Closes out a record. Guarded on `check_out_time IS NULL` so a racing
    /// double check-out loses cleanly; `None` means the record was already
    /// closed (or gone).
    pub async fn complete_check_out(
        &self,
        id: Uuid,
        check_out: DateTime<Utc>,
        hours_worked: f64,
        status: AttendanceStatus,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            UPDATE attendance_records
            SET
                check_out_time = $2,
                hours_worked = $3,
                status = $4,
                updated_at = $5
            WHERE
                id = $1 AND check_out_time IS NULL
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(check_out)
        .bind(hours_worked)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Administrative upsert keyed on (employee, day). One atomic statement,
    /// so two concurrent manual entries for the same key cannot create a
    /// duplicate row; the second simply overwrites the fields of the first.
    #[allow(clippy::too_many_arguments)]
    pub async fn manual_upsert(
        &self,
        employee_id: Uuid,
        day: NaiveDate,
        check_in: Option<DateTime<Utc>>,
        check_out: Option<DateTime<Utc>>,
        hours_worked: f64,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> Result<AttendanceRecord, AppError> {
        let now = Utc::now();

        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            INSERT INTO
                attendance_records (
                    id, employee_id, day, check_in_time, check_out_time,
                    hours_worked, status, notes, created_at, updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ON CONFLICT (employee_id, day) DO UPDATE
            SET
                check_in_time = COALESCE(EXCLUDED.check_in_time, attendance_records.check_in_time),
                check_out_time = COALESCE(EXCLUDED.check_out_time, attendance_records.check_out_time),
                hours_worked = EXCLUDED.hours_worked,
                status = EXCLUDED.status,
                notes = COALESCE(EXCLUDED.notes, attendance_records.notes),
                updated_at = EXCLUDED.updated_at
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(employee_id)
        .bind(day)
        .bind(check_in)
        .bind(check_out)
        .bind(hours_worked)
        .bind(status)
        .bind(notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict(
                    "An attendance record for this employee on this date already exists"
                        .to_string(),
                )
            } else {
                e.into()
            }
        })?;

        Ok(record)
    }

    /// Ledger query. `employee_ids = None` means unscoped; an empty slice
    /// matches nothing.
    pub async fn find(
        &self,
        employee_ids: Option<Vec<Uuid>>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance_records
            WHERE
                ($1::uuid[] IS NULL OR employee_id = ANY($1))
                AND ($2::date IS NULL OR day >= $2)
                AND ($3::date IS NULL OR day <= $3)
            ORDER BY day DESC
            "#
        ))
        .bind(employee_ids)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM attendance_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
