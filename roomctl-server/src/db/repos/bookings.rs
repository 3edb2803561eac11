//! Booking repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use roomctl_core::{Booking, BookingPatch, NewBooking};

use crate::db::error::{decode_status, DbError};

/// Data access for bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: NewBooking) -> Result<Booking, DbError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Booking>, DbError>;
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Booking>, DbError>;
    async fn find_all(&self) -> Result<Vec<Booking>, DbError>;
    async fn update(&self, id: i32, patch: BookingPatch) -> Result<Booking, DbError>;
    async fn delete(&self, id: i32) -> Result<(), DbError>;
}

#[derive(FromRow)]
struct BookingRow {
    id: i32,
    user_id: i32,
    title: String,
    description: Option<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DbError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            status: decode_status(row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed booking repository
#[derive(Clone)]
pub struct PgBookingRepo {
    pool: PgPool,
}

impl PgBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepo {
    async fn create(&self, booking: NewBooking) -> Result<Booking, DbError> {
        let row: BookingRow = sqlx::query_as(
            r#"
            INSERT INTO bookings (user_id, title, description, start_time, end_time, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING id, user_id, title, description, start_time, end_time, status, created_at, updated_at
            "#,
        )
        .bind(booking.user_id)
        .bind(&booking.title)
        .bind(&booking.description)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Booking>, DbError> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, description, start_time, end_time, status, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }

    /// All bookings of a user, earliest start first.
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Booking>, DbError> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, description, start_time, end_time, status, created_at, updated_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY start_time, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_all(&self) -> Result<Vec<Booking>, DbError> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, description, start_time, end_time, status, created_at, updated_at
            FROM bookings
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn update(&self, id: i32, patch: BookingPatch) -> Result<Booking, DbError> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
            UPDATE bookings
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                start_time = COALESCE($4, start_time),
                end_time = COALESCE($5, end_time),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, description, start_time, end_time, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| DbError::not_found("booking", id))?.try_into()
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
