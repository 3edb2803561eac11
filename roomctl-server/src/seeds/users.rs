use async_trait::async_trait;
use sqlx::PgConnection;

use super::{is_empty, reset_sequence, Seed, SeedOutcome};

/// Admin (id 1) and regular user (id 2)
pub struct UsersSeed;

#[async_trait]
impl Seed for UsersSeed {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn run(&self, conn: &mut PgConnection) -> Result<SeedOutcome, sqlx::Error> {
        if !is_empty(conn, "users").await? {
            return Ok(SeedOutcome::Skipped);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, password, role, status, created_at, updated_at)
            VALUES
                (1, 'admin@example.com', '$2b$10$hashedpassword', 'admin', 'active', NOW(), NOW()),
                (2, 'user@example.com', '$2b$10$hashedpassword', 'user', 'active', NOW(), NOW())
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .execute(&mut *conn)
        .await?;

        reset_sequence(conn, "users").await?;
        Ok(SeedOutcome::Inserted(result.rows_affected()))
    }
}
