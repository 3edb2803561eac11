use async_trait::async_trait;
use sqlx::PgConnection;

use super::{is_empty, reset_sequence, Seed, SeedOutcome};

/// One-hour booking for the regular user, starting a day from now
pub struct BookingsSeed;

#[async_trait]
impl Seed for BookingsSeed {
    fn name(&self) -> &'static str {
        "bookings"
    }

    async fn run(&self, conn: &mut PgConnection) -> Result<SeedOutcome, sqlx::Error> {
        if !is_empty(conn, "bookings").await? {
            return Ok(SeedOutcome::Skipped);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, title, description, start_time, end_time, status, created_at, updated_at)
            VALUES
                (1, 2, 'Team Sync', 'Weekly team synchronization meeting',
                 NOW() + INTERVAL '1 day', NOW() + INTERVAL '1 day' + INTERVAL '1 hour',
                 'confirmed', NOW(), NOW())
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .execute(&mut *conn)
        .await?;

        reset_sequence(conn, "bookings").await?;
        Ok(SeedOutcome::Inserted(result.rows_affected()))
    }
}
