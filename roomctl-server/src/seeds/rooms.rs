use async_trait::async_trait;
use sqlx::PgConnection;

use super::{is_empty, reset_sequence, Seed, SeedOutcome};

pub struct RoomsSeed;

#[async_trait]
impl Seed for RoomsSeed {
    fn name(&self) -> &'static str {
        "rooms"
    }

    async fn run(&self, conn: &mut PgConnection) -> Result<SeedOutcome, sqlx::Error> {
        if !is_empty(conn, "rooms").await? {
            return Ok(SeedOutcome::Skipped);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO rooms (id, name, capacity, description, status, created_at, updated_at)
            VALUES
                (1, 'Board Room', 12, 'Main conference room with video wall', 'available', NOW(), NOW()),
                (2, 'Huddle Room', 4, 'Small room for quick syncs', 'available', NOW(), NOW())
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .execute(&mut *conn)
        .await?;

        reset_sequence(conn, "rooms").await?;
        Ok(SeedOutcome::Inserted(result.rows_affected()))
    }
}
