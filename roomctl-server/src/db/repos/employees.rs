//! Employee repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use roomctl_core::{Employee, EmployeePatch, NewEmployee};

use crate::db::error::DbError;

/// Data access for employees
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, employee: NewEmployee) -> Result<Employee, DbError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, DbError>;
    async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Employee>, DbError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, DbError>;
    async fn find_all(&self) -> Result<Vec<Employee>, DbError>;
    async fn update(&self, id: i32, patch: EmployeePatch) -> Result<Employee, DbError>;
    async fn delete(&self, id: i32) -> Result<(), DbError>;
}

#[derive(FromRow)]
struct EmployeeRow {
    id: i32,
    user_id: i32,
    name: String,
    last_name: String,
    email: String,
    phone: String,
    address: String,
    position: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            position: row.position,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed employee repository
#[derive(Clone)]
pub struct PgEmployeeRepo {
    pool: PgPool,
}

impl PgEmployeeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepo {
    async fn create(&self, employee: NewEmployee) -> Result<Employee, DbError> {
        let row: EmployeeRow = sqlx::query_as(
            r#"
            INSERT INTO employees (user_id, name, last_name, email, phone, address, position, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            RETURNING id, user_id, name, last_name, email, phone, address, position, created_at, updated_at
            "#,
        )
        .bind(employee.user_id)
        .bind(&employee.name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.address)
        .bind(&employee.position)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, DbError> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, name, last_name, email, phone, address, position, created_at, updated_at
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Employee::from))
    }

    /// First employee profile for the user (lowest id).
    async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Employee>, DbError> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, name, last_name, email, phone, address, position, created_at, updated_at
            FROM employees
            WHERE user_id = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Employee::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, DbError> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, name, last_name, email, phone, address, position, created_at, updated_at
            FROM employees
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Employee::from))
    }

    async fn find_all(&self) -> Result<Vec<Employee>, DbError> {
        let rows: Vec<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, name, last_name, email, phone, address, position, created_at, updated_at
            FROM employees
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn update(&self, id: i32, patch: EmployeePatch) -> Result<Employee, DbError> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            r#"
            UPDATE employees
            SET name = COALESCE($2, name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                position = COALESCE($7, position),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, name, last_name, email, phone, address, position, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.last_name)
        .bind(patch.email)
        .bind(patch.phone)
        .bind(patch.address)
        .bind(patch.position)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Employee::from)
            .ok_or_else(|| DbError::not_found("employee", id))
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
