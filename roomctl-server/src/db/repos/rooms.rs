//! Room repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use roomctl_core::{NewRoom, Room, RoomPatch};

use crate::db::error::{decode_status, DbError};

/// Data access for rooms
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: NewRoom) -> Result<Room, DbError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Room>, DbError>;
    async fn find_all(&self) -> Result<Vec<Room>, DbError>;
    async fn update(&self, id: i32, patch: RoomPatch) -> Result<Room, DbError>;
    async fn delete(&self, id: i32) -> Result<(), DbError>;
}

#[derive(FromRow)]
struct RoomRow {
    id: i32,
    name: String,
    capacity: i32,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RoomRow> for Room {
    type Error = DbError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        Ok(Room {
            id: row.id,
            name: row.name,
            capacity: row.capacity,
            description: row.description,
            status: decode_status(row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed room repository
#[derive(Clone)]
pub struct PgRoomRepo {
    pool: PgPool,
}

impl PgRoomRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepo {
    async fn create(&self, room: NewRoom) -> Result<Room, DbError> {
        let row: RoomRow = sqlx::query_as(
            r#"
            INSERT INTO rooms (name, capacity, description, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, name, capacity, description, status, created_at, updated_at
            "#,
        )
        .bind(&room.name)
        .bind(room.capacity)
        .bind(&room.description)
        .bind(room.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Room>, DbError> {
        let row: Option<RoomRow> = sqlx::query_as(
            r#"
            SELECT id, name, capacity, description, status, created_at, updated_at
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Room::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Room>, DbError> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            r#"
            SELECT id, name, capacity, description, status, created_at, updated_at
            FROM rooms
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Room::try_from).collect()
    }

    async fn update(&self, id: i32, patch: RoomPatch) -> Result<Room, DbError> {
        let row: Option<RoomRow> = sqlx::query_as(
            r#"
            UPDATE rooms
            SET name = COALESCE($2, name),
                capacity = COALESCE($3, capacity),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, capacity, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.capacity)
        .bind(patch.description)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| DbError::not_found("room", id))?.try_into()
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
