use std::path::PathBuf;

use sqlx::PgPool;

use super::file::MigrationFile;
use super::{MigrationError, MigrationSource};

/// Which way to move the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Up,
    /// Forget the most recent migration record (no reverse SQL is run)
    Down,
}

/// What a [`MigrationRunner::run`] call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationReport {
    NothingToDo,
    Applied(Vec<String>),
    RolledBack(String),
}

/// Executed record names and files still to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Recorded names, in application order
    pub executed: Vec<String>,
    /// Files without a record, in filename order
    pub pending: Vec<MigrationFile>,
}

impl MigrationStatus {
    /// Split the directory listing against the recorded names.
    pub fn compute(executed: Vec<String>, files: Vec<MigrationFile>) -> Self {
        let pending = files
            .into_iter()
            .filter(|f| !executed.contains(&f.name))
            .collect();
        Self { executed, pending }
    }

    pub fn pending_names(&self) -> Vec<&str> {
        self.pending.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Applies migrations from one source against a pool.
pub struct MigrationRunner<'a> {
    pool: &'a PgPool,
    source: MigrationSource,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(pool: &'a PgPool, source: MigrationSource) -> Self {
        Self { pool, source }
    }

    /// Runner over the migrations compiled into the binary.
    pub fn embedded(pool: &'a PgPool) -> Self {
        Self::new(pool, MigrationSource::Embedded)
    }

    /// Runner over `dir`, which must exist.
    pub fn from_dir(pool: &'a PgPool, dir: impl Into<PathBuf>) -> Self {
        Self::new(pool, MigrationSource::Dir(dir.into()))
    }

    pub fn source(&self) -> &MigrationSource {
        &self.source
    }

    async fn ensure_table(&self) -> Result<(), MigrationError> {
        // Checked first so an existing table does not raise a server NOTICE
        let exists: bool = sqlx::query_scalar("SELECT to_regclass('migrations') IS NOT NULL")
            .fetch_one(self.pool)
            .await?;
        if exists {
            return Ok(());
        }

        tracing::debug!("creating migrations table");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS migrations (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                executed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(self.pool)
        .await?;
        Ok(())
    }

    async fn executed(&self) -> Result<Vec<String>, MigrationError> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM migrations ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        Ok(names)
    }

    /// Recorded and pending migrations.
    pub async fn status(&self) -> Result<MigrationStatus, MigrationError> {
        let files = self.source.list().await?;
        self.ensure_table().await?;
        let executed = self.executed().await?;
        Ok(MigrationStatus::compute(executed, files))
    }

    pub async fn run(&self, direction: Direction) -> Result<MigrationReport, MigrationError> {
        match direction {
            Direction::Up => self.up().await,
            Direction::Down => self.down().await,
        }
    }

    /// Apply every pending file in order, one transaction per file.
    ///
    /// Stops at the first failure; files before it stay applied.
    async fn up(&self) -> Result<MigrationReport, MigrationError> {
        let status = self.status().await?;
        if status.pending.is_empty() {
            tracing::info!("No pending migrations");
            return Ok(MigrationReport::NothingToDo);
        }

        tracing::info!(count = status.pending.len(), "running pending migrations");
        let mut applied = Vec::with_capacity(status.pending.len());
        for file in &status.pending {
            self.apply(file).await?;
            applied.push(file.name.clone());
        }
        Ok(MigrationReport::Applied(applied))
    }

    async fn apply(&self, file: &MigrationFile) -> Result<(), MigrationError> {
        let sql = file.read_sql().await?;
        let failed = |source: sqlx::Error| MigrationError::Failed {
            name: file.name.clone(),
            source,
        };

        tracing::info!(migration = %file.name, "applying migration");
        let mut tx = self.pool.begin().await?;
        sqlx::raw_sql(&sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(migration = %file.name, error = %e, "migration failed");
                failed(e)
            })?;
        sqlx::query("INSERT INTO migrations (name) VALUES ($1)")
            .bind(&file.name)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        tx.commit().await.map_err(failed)?;

        tracing::info!(migration = %file.name, "migration applied");
        Ok(())
    }

    /// Forget the most recently applied migration.
    async fn down(&self) -> Result<MigrationReport, MigrationError> {
        self.ensure_table().await?;

        let last: Option<(i32, String)> =
            sqlx::query_as("SELECT id, name FROM migrations ORDER BY id DESC LIMIT 1")
                .fetch_optional(self.pool)
                .await?;

        let Some((id, name)) = last else {
            tracing::info!("No migrations to roll back");
            return Ok(MigrationReport::NothingToDo);
        };

        sqlx::query("DELETE FROM migrations WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        tracing::warn!(
            migration = %name,
            "rollback removed the migration record only; schema changes were not reverted"
        );
        Ok(MigrationReport::RolledBack(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScratchSchema;
    use std::path::Path;

    fn file(name: &str) -> MigrationFile {
        MigrationFile::parse(Path::new("m"), name).unwrap()
    }

    #[test]
    fn compute_splits_executed_and_pending() {
        let status = MigrationStatus::compute(
            vec!["20240101000000_init.sql".into()],
            vec![
                file("20240101000000_init.sql"),
                file("20240102000000_add_bookings.sql"),
            ],
        );
        assert_eq!(status.executed, ["20240101000000_init.sql"]);
        assert_eq!(status.pending_names(), ["20240102000000_add_bookings.sql"]);
    }

    #[test]
    fn compute_preserves_file_order() {
        let files = vec![
            file("20240101000000_a.sql"),
            file("20240102000000_b.sql"),
            file("20240103000000_c.sql"),
            file("20240104000000_d.sql"),
        ];
        let status = MigrationStatus::compute(
            vec!["20240103000000_c.sql".into(), "20240101000000_a.sql".into()],
            files,
        );
        assert_eq!(
            status.pending_names(),
            ["20240102000000_b.sql", "20240104000000_d.sql"]
        );
    }

    #[test]
    fn compute_with_nothing_recorded_is_all_pending() {
        let status = MigrationStatus::compute(Vec::new(), vec![file("20240101000000_init.sql")]);
        assert!(status.executed.is_empty());
        assert_eq!(status.pending.len(), 1);
    }

    // Integration tests run in a throwaway schema
    // Run with: DATABASE_URL=postgres://... cargo test -p roomctl-server -- --ignored

    fn write_files(dir: &Path, files: &[(&str, &str)]) {
        for (name, sql) in files {
            std::fs::write(dir.join(name), sql).unwrap();
        }
    }

    async fn table_exists(pool: &PgPool, table: &str) -> bool {
        sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(table)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn up_applies_then_does_nothing() {
        let scratch = ScratchSchema::create().await;
        let dir = tempfile::tempdir().unwrap();
        write_files(
            dir.path(),
            &[
                ("20240101000000_init.sql", "CREATE TABLE a (id INT); CREATE TABLE b (id INT);"),
                ("20240102000000_more.sql", "CREATE TABLE c (id INT);"),
            ],
        );
        let runner = MigrationRunner::from_dir(&scratch.pool, dir.path());

        let report = runner.run(Direction::Up).await.unwrap();
        assert_eq!(
            report,
            MigrationReport::Applied(vec![
                "20240101000000_init.sql".into(),
                "20240102000000_more.sql".into(),
            ])
        );
        assert!(table_exists(&scratch.pool, "c").await);

        assert_eq!(
            runner.run(Direction::Up).await.unwrap(),
            MigrationReport::NothingToDo
        );
        assert_eq!(runner.status().await.unwrap().executed.len(), 2);

        scratch.drop().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn failing_file_aborts_remaining_queue() {
        let scratch = ScratchSchema::create().await;
        let dir = tempfile::tempdir().unwrap();
        write_files(
            dir.path(),
            &[
                ("20240101000000_ok.sql", "CREATE TABLE first_t (id INT);"),
                ("20240102000000_bad.sql", "CREATE TABLE half_t (id INT); SELECT * FROM missing_t;"),
                ("20240103000000_later.sql", "CREATE TABLE later_t (id INT);"),
            ],
        );
        let runner = MigrationRunner::from_dir(&scratch.pool, dir.path());

        let err = runner.run(Direction::Up).await.unwrap_err();
        assert!(matches!(err, MigrationError::Failed { ref name, .. } if name == "20240102000000_bad.sql"));

        assert!(table_exists(&scratch.pool, "first_t").await);
        assert!(!table_exists(&scratch.pool, "half_t").await);
        assert!(!table_exists(&scratch.pool, "later_t").await);

        let status = runner.status().await.unwrap();
        assert_eq!(status.executed, ["20240101000000_ok.sql"]);
        assert_eq!(status.pending.len(), 2);

        scratch.drop().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn down_forgets_last_record_only() {
        let scratch = ScratchSchema::create().await;
        let dir = tempfile::tempdir().unwrap();
        write_files(
            dir.path(),
            &[
                ("20240101000000_a.sql", "CREATE TABLE a (id INT);"),
                ("20240102000000_b.sql", "CREATE TABLE b (id INT);"),
            ],
        );
        let runner = MigrationRunner::from_dir(&scratch.pool, dir.path());
        runner.run(Direction::Up).await.unwrap();

        let report = runner.run(Direction::Down).await.unwrap();
        assert_eq!(report, MigrationReport::RolledBack("20240102000000_b.sql".into()));
        assert!(table_exists(&scratch.pool, "b").await);

        let status = runner.status().await.unwrap();
        assert_eq!(status.executed, ["20240101000000_a.sql"]);
        assert_eq!(status.pending_names(), ["20240102000000_b.sql"]);

        scratch.drop().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn down_with_nothing_applied_is_noop() {
        let scratch = ScratchSchema::create().await;
        let runner = MigrationRunner::from_dir(&scratch.pool, "does-not-exist");
        assert_eq!(
            runner.run(Direction::Down).await.unwrap(),
            MigrationReport::NothingToDo
        );
        scratch.drop().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_directory_fails_instead_of_reporting_nothing() {
        let scratch = ScratchSchema::create().await;
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent");
        let runner = MigrationRunner::from_dir(&scratch.pool, &absent);

        let err = runner.run(Direction::Up).await.unwrap_err();
        assert!(matches!(err, MigrationError::MissingDirectory(ref p) if *p == absent));
        assert!(matches!(
            runner.status().await.unwrap_err(),
            MigrationError::MissingDirectory(_)
        ));

        scratch.drop().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn embedded_migrations_create_every_table() {
        let scratch = ScratchSchema::create().await;
        let runner = MigrationRunner::embedded(&scratch.pool);

        match runner.run(Direction::Up).await.unwrap() {
            MigrationReport::Applied(names) => assert_eq!(names.len(), 5),
            other => panic!("unexpected report {:?}", other),
        }
        for table in ["users", "employees", "bookings", "equipment", "rooms"] {
            assert!(table_exists(&scratch.pool, table).await, "{table} missing");
        }

        scratch.drop().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn repeated_status_reuses_metadata_table() {
        let scratch = ScratchSchema::create().await;
        let runner = MigrationRunner::embedded(&scratch.pool);

        assert!(!table_exists(&scratch.pool, "migrations").await);
        runner.status().await.unwrap();
        assert!(table_exists(&scratch.pool, "migrations").await);
        let again = runner.status().await.unwrap();
        assert!(again.executed.is_empty());
        assert_eq!(again.pending.len(), 5);

        scratch.drop().await;
    }
}
