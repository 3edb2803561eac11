//! Idempotent sample data
//!
//! Each seed checks its table's row count and inserts a fixed set of rows
//! only when the table is empty. Seeds run on the runner's transaction, so a
//! failing seed leaves nothing behind from its batch.

mod bookings;
mod employees;
mod equipment;
mod rooms;
mod users;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

pub use bookings::BookingsSeed;
pub use employees::EmployeesSeed;
pub use equipment::EquipmentSeed;
pub use rooms::RoomsSeed;
pub use users::UsersSeed;

/// What one seed did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted(u64),
    /// Table already had rows
    Skipped,
}

/// One named, re-runnable seed
#[async_trait]
pub trait Seed: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, conn: &mut PgConnection) -> Result<SeedOutcome, sqlx::Error>;
}

/// Seed error type
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("seed '{0}' not found")]
    UnknownSeed(String),

    #[error("seed {name} failed")]
    Failed {
        name: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// Registered seeds in dependency order.
pub fn default_seeds() -> Vec<Box<dyn Seed>> {
    vec![
        Box::new(UsersSeed),
        Box::new(EmployeesSeed),
        Box::new(BookingsSeed),
        Box::new(EquipmentSeed),
        Box::new(RoomsSeed),
    ]
}

/// `true` when `table` has no rows.
async fn is_empty(conn: &mut PgConnection, table: &'static str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&mut *conn)
        .await?;
    Ok(count == 0)
}

/// Move a SERIAL sequence past explicitly inserted ids.
async fn reset_sequence(conn: &mut PgConnection, table: &'static str) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), (SELECT MAX(id) FROM {table}))"
    ))
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Runs seeds inside transactions on a pool.
pub struct SeedRunner<'a> {
    pool: &'a PgPool,
    seeds: Vec<Box<dyn Seed>>,
}

impl<'a> SeedRunner<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self::with_seeds(pool, default_seeds())
    }

    pub fn with_seeds(pool: &'a PgPool, seeds: Vec<Box<dyn Seed>>) -> Self {
        Self { pool, seeds }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.seeds.iter().map(|s| s.name()).collect()
    }

    /// Run every seed in order inside one transaction.
    pub async fn run_all(&self) -> Result<Vec<(&'static str, SeedOutcome)>, SeedError> {
        tracing::info!(count = self.seeds.len(), "running seeds");
        let mut tx = self.pool.begin().await?;

        let mut outcomes = Vec::with_capacity(self.seeds.len());
        for seed in &self.seeds {
            let outcome = run_seed(seed.as_ref(), &mut *tx).await?;
            outcomes.push((seed.name(), outcome));
        }

        tx.commit().await?;
        tracing::info!("all seeds completed");
        Ok(outcomes)
    }

    /// Run a single seed by name in its own transaction.
    pub async fn run_one(&self, name: &str) -> Result<SeedOutcome, SeedError> {
        let seed = self
            .seeds
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| SeedError::UnknownSeed(name.to_string()))?;

        let mut tx = self.pool.begin().await?;
        let outcome = run_seed(seed.as_ref(), &mut *tx).await?;
        tx.commit().await?;
        Ok(outcome)
    }
}

async fn run_seed(seed: &dyn Seed, conn: &mut PgConnection) -> Result<SeedOutcome, SeedError> {
    let name = seed.name();
    tracing::info!(seed = name, "seeding");

    let outcome = seed.run(conn).await.map_err(|source| {
        tracing::error!(seed = name, error = %source, "seed failed");
        SeedError::Failed { name, source }
    })?;

    match outcome {
        SeedOutcome::Inserted(rows) => tracing::info!(seed = name, rows, "seed completed"),
        SeedOutcome::Skipped => tracing::info!(seed = name, "already seeded, skipping"),
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    use crate::migrations::{Direction, MigrationRunner};
    use crate::test_support::ScratchSchema;

    #[test]
    fn default_order_follows_foreign_keys() {
        let names: Vec<_> = default_seeds().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["users", "employees", "bookings", "equipment", "rooms"]);
    }

    #[tokio::test]
    async fn unknown_seed_is_rejected_before_touching_the_pool() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let err = SeedRunner::new(&pool).run_one("invoices").await.unwrap_err();
        assert!(matches!(err, SeedError::UnknownSeed(n) if n == "invoices"));
    }

    // Integration tests run in a freshly migrated throwaway schema
    // Run with: DATABASE_URL=postgres://... cargo test -p roomctl-server -- --ignored

    async fn migrated() -> ScratchSchema {
        let scratch = ScratchSchema::create().await;
        MigrationRunner::embedded(&scratch.pool)
            .run(Direction::Up)
            .await
            .unwrap();
        scratch
    }

    async fn count(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn seeding_twice_inserts_once() {
        let scratch = migrated().await;
        let runner = SeedRunner::new(&scratch.pool);

        let first = runner.run_all().await.unwrap();
        assert_eq!(first[0], ("users", SeedOutcome::Inserted(2)));
        assert_eq!(first[3], ("equipment", SeedOutcome::Inserted(4)));

        let second = runner.run_all().await.unwrap();
        assert!(second.iter().all(|(_, o)| *o == SeedOutcome::Skipped));
        assert_eq!(count(&scratch.pool, "users").await, 2);
        assert_eq!(count(&scratch.pool, "equipment").await, 4);

        // Sequence moved past the fixed ids
        let next: i32 = sqlx::query_scalar(
            "INSERT INTO users (email, password) VALUES ('next@example.com', 'x') RETURNING id",
        )
        .fetch_one(&scratch.pool)
        .await
        .unwrap();
        assert_eq!(next, 3);

        scratch.drop().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn run_one_seeds_only_that_table() {
        let scratch = migrated().await;
        let outcome = SeedRunner::new(&scratch.pool).run_one("rooms").await.unwrap();
        assert_eq!(outcome, SeedOutcome::Inserted(2));
        assert_eq!(count(&scratch.pool, "users").await, 0);
        scratch.drop().await;
    }

    struct Broken;

    #[async_trait]
    impl Seed for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn run(&self, conn: &mut PgConnection) -> Result<SeedOutcome, sqlx::Error> {
            sqlx::query("INSERT INTO nowhere VALUES (1)")
                .execute(&mut *conn)
                .await?;
            Ok(SeedOutcome::Inserted(1))
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn failing_seed_rolls_back_the_batch() {
        let scratch = migrated().await;
        let runner = SeedRunner::with_seeds(&scratch.pool, vec![Box::new(UsersSeed), Box::new(Broken)]);

        let err = runner.run_all().await.unwrap_err();
        assert!(matches!(err, SeedError::Failed { name: "broken", .. }));
        assert_eq!(count(&scratch.pool, "users").await, 0);

        scratch.drop().await;
    }
}
