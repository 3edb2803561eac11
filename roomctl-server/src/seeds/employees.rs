use async_trait::async_trait;
use sqlx::PgConnection;

use super::{is_empty, reset_sequence, Seed, SeedOutcome};

/// Employee profile for the regular user
pub struct EmployeesSeed;

#[async_trait]
impl Seed for EmployeesSeed {
    fn name(&self) -> &'static str {
        "employees"
    }

    async fn run(&self, conn: &mut PgConnection) -> Result<SeedOutcome, sqlx::Error> {
        if !is_empty(conn, "employees").await? {
            return Ok(SeedOutcome::Skipped);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO employees (id, user_id, name, last_name, email, phone, address, position, created_at, updated_at)
            VALUES
                (1, 2, 'John', 'Doe', 'user@example.com', '555-0123', '123 Main St', 'Developer', NOW(), NOW())
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .execute(&mut *conn)
        .await?;

        reset_sequence(conn, "employees").await?;
        Ok(SeedOutcome::Inserted(result.rows_affected()))
    }
}
