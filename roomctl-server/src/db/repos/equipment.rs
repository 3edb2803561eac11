//! Equipment repository
//!
//! Equipment rows are keyed by UUID; the `type` column maps onto
//! [`Equipment::equipment_type`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use roomctl_core::{Equipment, EquipmentPatch, EquipmentStatus, NewEquipment};

use crate::db::error::{decode_status, DbError};

/// Data access for equipment
#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    async fn create(&self, equipment: NewEquipment) -> Result<Equipment, DbError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Equipment>, DbError>;
    async fn find_all(&self) -> Result<Vec<Equipment>, DbError>;
    async fn find_by_status(&self, status: EquipmentStatus) -> Result<Vec<Equipment>, DbError>;
    async fn update(&self, id: Uuid, patch: EquipmentPatch) -> Result<Equipment, DbError>;
    async fn delete(&self, id: Uuid) -> Result<(), DbError>;
}

#[derive(FromRow)]
struct EquipmentRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    #[sqlx(rename = "type")]
    equipment_type: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EquipmentRow> for Equipment {
    type Error = DbError;

    fn try_from(row: EquipmentRow) -> Result<Self, Self::Error> {
        Ok(Equipment {
            id: row.id,
            name: row.name,
            description: row.description,
            equipment_type: row.equipment_type,
            status: decode_status(row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed equipment repository
#[derive(Clone)]
pub struct PgEquipmentRepo {
    pool: PgPool,
}

impl PgEquipmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentRepository for PgEquipmentRepo {
    async fn create(&self, equipment: NewEquipment) -> Result<Equipment, DbError> {
        let row: EquipmentRow = sqlx::query_as(
            r#"
            INSERT INTO equipment (name, description, type, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, name, description, type, status, created_at, updated_at
            "#,
        )
        .bind(&equipment.name)
        .bind(&equipment.description)
        .bind(&equipment.equipment_type)
        .bind(equipment.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Equipment>, DbError> {
        let row: Option<EquipmentRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, type, status, created_at, updated_at
            FROM equipment
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Equipment::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Equipment>, DbError> {
        let rows: Vec<EquipmentRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, type, status, created_at, updated_at
            FROM equipment
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Equipment::try_from).collect()
    }

    async fn find_by_status(&self, status: EquipmentStatus) -> Result<Vec<Equipment>, DbError> {
        let rows: Vec<EquipmentRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, type, status, created_at, updated_at
            FROM equipment
            WHERE status = $1
            ORDER BY name, id
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Equipment::try_from).collect()
    }

    async fn update(&self, id: Uuid, patch: EquipmentPatch) -> Result<Equipment, DbError> {
        let row: Option<EquipmentRow> = sqlx::query_as(
            r#"
            UPDATE equipment
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                type = COALESCE($4, type),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, type, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.equipment_type)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| DbError::not_found("equipment", id))?.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
