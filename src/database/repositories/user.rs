use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{User, UserRole};
use crate::error::AppError;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO
                users (id, name, email, password_hash, role, employee_id, created_at, updated_at)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.employee_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, password_hash, role, employee_id, created_at, updated_at
            FROM
                users
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, password_hash, role, employee_id, created_at, updated_at
            FROM
                users
            WHERE
                email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, password_hash, role, employee_id, created_at, updated_at
            FROM
                users
            ORDER BY
                created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Administrative patch of role and/or employee link; absent fields are
    /// left unchanged.
    pub async fn update_role_and_link(
        &self,
        id: Uuid,
        role: Option<UserRole>,
        employee_id: Option<Uuid>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                role = COALESCE($2, role),
                employee_id = COALESCE($3, employee_id),
                updated_at = $4
            WHERE
                id = $1
            RETURNING
                id, name, email, password_hash, role, employee_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .bind(employee_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
