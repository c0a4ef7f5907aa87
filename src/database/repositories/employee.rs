use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{CreateEmployeeInput, Employee, EmployeeStatus, UpdateEmployeeInput};
use crate::error::AppError;

const EMPLOYEE_COLUMNS: &str = r#"
    id, employee_code, first_name, last_name, email, phone, date_of_joining,
    department, designation, salary, status, manager_id, created_at, updated_at
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: CreateEmployeeInput) -> Result<Employee, AppError> {
        let now = Utc::now();

        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO
                employees (
                    id, employee_code, first_name, last_name, email, phone,
                    date_of_joining, department, designation, salary, status,
                    manager_id, created_at, updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&input.employee_code)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.date_of_joining)
        .bind(&input.department)
        .bind(&input.designation)
        .bind(&input.salary)
        .bind(EmployeeStatus::Active)
        .bind(input.manager_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict(
                    "Employee with this ID or email already exists".to_string(),
                )
            } else {
                e.into()
            }
        })?;

        Ok(employee)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Directory listing; terminated employees are kept out of it but remain
    /// reachable by id for historical ledger references.
    pub async fn list_active(&self) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            r#"
            SELECT {EMPLOYEE_COLUMNS}
            FROM employees
            WHERE status != $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(EmployeeStatus::Terminated)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Ids of the employees whose manager reference is the given identity.
    pub async fn find_report_ids(&self, manager_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT id FROM employees WHERE manager_id = $1")
                .bind(manager_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateEmployeeInput,
    ) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                date_of_joining = COALESCE($6, date_of_joining),
                department = COALESCE($7, department),
                designation = COALESCE($8, designation),
                salary = COALESCE($9, salary),
                status = COALESCE($10, status),
                manager_id = COALESCE($11, manager_id),
                updated_at = $12
            WHERE
                id = $1
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.date_of_joining)
        .bind(&input.department)
        .bind(&input.designation)
        .bind(&input.salary)
        .bind(input.status)
        .bind(input.manager_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict("Employee with this email already exists".to_string())
            } else {
                e.into()
            }
        })?;

        Ok(employee)
    }

    /// "Deletion" is a status transition; the row stays so attendance and
    /// leave history keep a valid reference.
    pub async fn terminate(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(EmployeeStatus::Terminated)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }
}
