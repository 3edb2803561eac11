//! User repository
//!
//! Direct mapping of CRUD calls onto the `users` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use roomctl_core::{NewUser, User, UserPatch};

use crate::db::error::{decode_status, DbError};

/// Data access for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, DbError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
    async fn find_all(&self) -> Result<Vec<User>, DbError>;
    async fn update(&self, id: i32, patch: UserPatch) -> Result<User, DbError>;
    async fn delete(&self, id: i32) -> Result<(), DbError>;
}

#[derive(FromRow)]
struct UserRow {
    id: i32,
    email: String,
    password: String,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            password: row.password,
            role: row.role,
            status: decode_status(row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepo {
    async fn create(&self, user: NewUser) -> Result<User, DbError> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (email, password, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, email, password, role, status, created_at, updated_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.role)
        .bind(user.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password, role, status, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password, role, status, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<User>, DbError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password, role, status, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, id: i32, patch: UserPatch) -> Result<User, DbError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                password = COALESCE($3, password),
                role = COALESCE($4, role),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password, role, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.email)
        .bind(patch.password)
        .bind(patch.role)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| DbError::not_found("user", id))?.try_into()
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
