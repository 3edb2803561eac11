use async_trait::async_trait;
use sqlx::PgConnection;

use super::{is_empty, Seed, SeedOutcome};

/// Four items with fixed UUIDs, one per status plus a spare
pub struct EquipmentSeed;

#[async_trait]
impl Seed for EquipmentSeed {
    fn name(&self) -> &'static str {
        "equipment"
    }

    async fn run(&self, conn: &mut PgConnection) -> Result<SeedOutcome, sqlx::Error> {
        if !is_empty(conn, "equipment").await? {
            return Ok(SeedOutcome::Skipped);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO equipment (id, name, description, type, status, created_at, updated_at)
            VALUES
                ('33333333-3333-3333-3333-333333333331', 'Projector 4K', 'High resolution projector for main hall', 'Projector', 'available', NOW(), NOW()),
                ('33333333-3333-3333-3333-333333333332', 'Whiteboard', 'Large magnetic whiteboard', 'Whiteboard', 'available', NOW(), NOW()),
                ('33333333-3333-3333-3333-333333333333', 'Conference Phone', 'Polycom conference phone', 'Audio', 'maintenance', NOW(), NOW()),
                ('33333333-3333-3333-3333-333333333334', 'HDMI Cable', '3m HDMI cable', 'Accessory', 'broken', NOW(), NOW())
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .execute(&mut *conn)
        .await?;

        Ok(SeedOutcome::Inserted(result.rows_affected()))
    }
}
