//! Database scripts: create, drop, backup, restore, migrate, seed, ping

use std::future::Future;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::Text;

use roomctl_core::AppConfig;
use roomctl_server::db::admin::{
    backup_database, create_database, drop_database, restore_backup, CreateOutcome,
    DEFAULT_BACKUP_DIR,
};
use roomctl_server::db::{close_pool, create_pool, ping, PgPool};
use roomctl_server::migrations::{Direction, MigrationReport, MigrationRunner, MigrationSource};
use roomctl_server::seeds::{SeedOutcome, SeedRunner};

#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Create the configured database if it does not exist
    Create,

    /// Drop the configured database (refused in production)
    Drop {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Dump the database to a timestamped SQL file with pg_dump
    Backup {
        /// Directory for the dump file
        #[arg(long, default_value = DEFAULT_BACKUP_DIR)]
        out_dir: PathBuf,
    },

    /// Replay a SQL dump into a freshly created database (refused in production)
    Restore {
        /// Dump file produced by `roomctl db backup`
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Apply pending migrations, or forget the latest one with `down`
    Migrate {
        #[arg(value_enum, default_value_t = MigrateDirection::Up)]
        direction: MigrateDirection,

        #[command(flatten)]
        dir: MigrationsDir,
    },

    /// Same as `migrate down`
    Rollback {
        #[command(flatten)]
        dir: MigrationsDir,
    },

    /// List executed and pending migrations
    Status {
        #[command(flatten)]
        dir: MigrationsDir,
    },

    /// Insert sample data into empty tables
    Seed {
        /// Run a single seed by name (users, employees, bookings, equipment, rooms)
        name: Option<String>,
    },

    /// Check that the database answers `SELECT NOW()`
    Ping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MigrateDirection {
    Up,
    Down,
}

impl From<MigrateDirection> for Direction {
    fn from(d: MigrateDirection) -> Self {
        match d {
            MigrateDirection::Up => Direction::Up,
            MigrateDirection::Down => Direction::Down,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct MigrationsDir {
    /// Directory holding the migration files (default: the built-in migrations)
    #[arg(long = "dir", env = "ROOMCTL_MIGRATIONS_DIR")]
    pub path: Option<PathBuf>,
}

impl MigrationsDir {
    /// Resolve the source, failing before any connection when an explicit
    /// directory is missing.
    fn source(self) -> Result<MigrationSource> {
        match self.path {
            None => Ok(MigrationSource::Embedded),
            Some(dir) if dir.is_dir() => Ok(MigrationSource::Dir(dir)),
            Some(dir) => bail!("Migrations directory not found: {}", dir.display()),
        }
    }
}

pub async fn run_db(args: DbArgs, config: &AppConfig) -> Result<()> {
    match args.command {
        DbCommand::Create => run_create(config).await,
        DbCommand::Drop { yes } => run_drop(config, yes).await,
        DbCommand::Backup { out_dir } => {
            let file = backup_database(&config.db, &out_dir)
                .await
                .context("Backup failed")?;
            println!("Backup written to {}", file.display());
            Ok(())
        }
        DbCommand::Restore { file, yes } => run_restore(config, file, yes).await,
        DbCommand::Migrate { direction, dir } => {
            run_migrate(config, direction.into(), dir.source()?).await
        }
        DbCommand::Rollback { dir } => run_migrate(config, Direction::Down, dir.source()?).await,
        DbCommand::Status { dir } => run_status(config, dir.source()?).await,
        DbCommand::Seed { name } => run_seed(config, name).await,
        DbCommand::Ping => {
            with_pool(config, |pool| async move {
                ping(&pool).await.context("Database did not answer")?;
                println!("Database connection OK ({})", config.db.database_name());
                Ok(())
            })
            .await
        }
    }
}

/// Open a pool, run `f`, and close the pool whether or not `f` succeeded.
async fn with_pool<F, Fut>(config: &AppConfig, f: F) -> Result<()>
where
    F: FnOnce(PgPool) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let pool = create_pool(&config.db)
        .await
        .with_context(|| format!("Failed to connect to {}", config.db.database_name()))?;
    let result = f(pool.clone()).await;
    close_pool(pool).await;
    result
}

/// Destructive commands are refused outright when NODE_ENV=production.
fn refuse_in_production(config: &AppConfig, action: &str) -> Result<()> {
    if config.environment.is_production() {
        bail!("Refusing to {} in production (NODE_ENV=production)", action);
    }
    Ok(())
}

/// Ask the user to type `yes`; anything else aborts.
fn confirm(message: &str) -> Result<bool> {
    let answer = Text::new(message)
        .with_help_message("Type 'yes' to continue")
        .prompt()
        .context("Confirmation prompt failed")?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

async fn run_create(config: &AppConfig) -> Result<()> {
    let name = config.db.database_name();
    match create_database(&config.db).await? {
        CreateOutcome::Created => println!("Database {} created", name),
        CreateOutcome::AlreadyExists => println!("Database {} already exists", name),
    }
    Ok(())
}

async fn run_drop(config: &AppConfig, yes: bool) -> Result<()> {
    refuse_in_production(config, "drop the database")?;
    let name = config.db.database_name();
    if !yes && !confirm(&format!("Drop database {}? All data will be lost.", name))? {
        println!("Aborted");
        return Ok(());
    }
    drop_database(&config.db).await?;
    println!("Database {} dropped", name);
    Ok(())
}

async fn run_restore(config: &AppConfig, file: PathBuf, yes: bool) -> Result<()> {
    refuse_in_production(config, "restore a backup")?;
    if !file.is_file() {
        bail!("Backup file not found: {}", file.display());
    }
    let prompt = format!(
        "Restore {} into {}? The database must be freshly created \
         (db drop, db create) or the restore will fail.",
        file.display(),
        config.db.database_name()
    );
    if !yes && !confirm(&prompt)? {
        println!("Aborted");
        return Ok(());
    }

    with_pool(config, |pool| async move {
        restore_backup(&pool, &file).await.context("Restore failed")?;
        println!("Restored {}", file.display());
        Ok(())
    })
    .await
}

async fn run_migrate(
    config: &AppConfig,
    direction: Direction,
    source: MigrationSource,
) -> Result<()> {
    tracing::debug!(%source, "migration source");
    with_pool(config, |pool| async move {
        let runner = MigrationRunner::new(&pool, source);
        if direction == Direction::Up {
            let status = runner.status().await?;
            println!(
                "Executed: {}, pending: {}",
                status.executed.len(),
                status.pending.len()
            );
        }

        match runner.run(direction).await? {
            MigrationReport::NothingToDo => match direction {
                Direction::Up => println!("No pending migrations"),
                Direction::Down => println!("No migrations to roll back"),
            },
            MigrationReport::Applied(names) => {
                for name in &names {
                    println!("  applied {}", name);
                }
                println!("{} migration(s) applied", names.len());
            }
            MigrationReport::RolledBack(name) => {
                println!("Forgot migration {}", name);
                println!("Note: only the record was removed; the schema was not changed");
            }
        }
        Ok(())
    })
    .await
}

async fn run_status(config: &AppConfig, source: MigrationSource) -> Result<()> {
    with_pool(config, |pool| async move {
        let status = MigrationRunner::new(&pool, source).status().await?;

        println!("Executed migrations ({}):", status.executed.len());
        for name in &status.executed {
            println!("  {}", name);
        }
        println!("Pending migrations ({}):", status.pending.len());
        for name in status.pending_names() {
            println!("  {}", name);
        }
        Ok(())
    })
    .await
}

fn describe(outcome: SeedOutcome) -> String {
    match outcome {
        SeedOutcome::Inserted(n) => format!("inserted {} row(s)", n),
        SeedOutcome::Skipped => "skipped (table not empty)".to_string(),
    }
}

async fn run_seed(config: &AppConfig, name: Option<String>) -> Result<()> {
    with_pool(config, |pool| async move {
        let runner = SeedRunner::new(&pool);
        match name {
            Some(name) => {
                let outcome = runner.run_one(&name).await?;
                println!("{}: {}", name, describe(outcome));
            }
            None => {
                for (name, outcome) in runner.run_all().await? {
                    println!("{}: {}", name, describe(outcome));
                }
            }
        }
        Ok(())
    })
    .await
}
