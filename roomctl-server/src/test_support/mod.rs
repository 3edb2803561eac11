//! Shared helpers for database-backed tests

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use roomctl_core::DbConfig;

use crate::db::connect_options;

/// A uniquely named schema with a pool whose `search_path` startup
/// parameter points at it.
///
/// Lets runner tests create the `migrations` table and application tables
/// without touching the real ones.
pub struct ScratchSchema {
    pub pool: PgPool,
    name: String,
    admin: PgPool,
}

impl ScratchSchema {
    pub async fn create() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let config = DbConfig {
            url: Some(url),
            ..DbConfig::default()
        };
        let options = connect_options(&config).unwrap();
        let name = format!("roomctl_test_{}", uuid::Uuid::new_v4().simple());

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await
            .expect("connect failed");
        sqlx::raw_sql(&format!("CREATE SCHEMA {}", name))
            .execute(&admin)
            .await
            .unwrap();

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(options.options([("search_path", name.as_str())]))
            .await
            .expect("connect failed");

        Self { pool, name, admin }
    }

    pub async fn drop(self) {
        self.pool.close().await;
        sqlx::raw_sql(&format!("DROP SCHEMA {} CASCADE", self.name))
            .execute(&self.admin)
            .await
            .unwrap();
        self.admin.close().await;
    }
}

pub mod memory;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn scratch_pool_resolves_to_its_schema() {
        let scratch = ScratchSchema::create().await;
        for _ in 0..3 {
            let schema: String = sqlx::query_scalar("SELECT current_schema()")
                .fetch_one(&scratch.pool)
                .await
                .unwrap();
            assert_eq!(schema, scratch.name);
        }
        scratch.drop().await;
    }
}
