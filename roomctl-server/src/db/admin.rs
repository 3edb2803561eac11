//! Database administration: create, drop, backup and restore
//!
//! Create and drop connect to the `postgres` maintenance database because a
//! database cannot create or drop itself. Backup shells out to `pg_dump`;
//! restore replays a plain SQL dump through the pool inside one transaction.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::{Connection, PgConnection, PgPool};
use tokio::process::Command;

use roomctl_core::DbConfig;

use super::pool::connect_options;

/// Default backup directory, relative to the working directory
pub const DEFAULT_BACKUP_DIR: &str = "database/backups";

const MAINTENANCE_DB: &str = "postgres";

/// Identifiers are interpolated into DDL, so only plain names are accepted.
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("valid regex"));

/// Administration error type
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("invalid database name '{0}' (letters, digits and underscores only)")]
    InvalidDatabaseName(String),

    #[error("{tool} failed: {message}")]
    ExternalTool { tool: &'static str, message: String },

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// Result of [`create_database`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Validate and double-quote a database identifier for use in DDL.
pub fn quote_identifier(name: &str) -> Result<String, AdminError> {
    if !IDENTIFIER.is_match(name) {
        return Err(AdminError::InvalidDatabaseName(name.to_string()));
    }
    Ok(format!("\"{}\"", name))
}

async fn connect_maintenance(config: &DbConfig) -> Result<PgConnection, AdminError> {
    let options = connect_options(config)?.database(MAINTENANCE_DB);
    Ok(PgConnection::connect_with(&options).await?)
}

/// Create the configured database unless it already exists.
pub async fn create_database(config: &DbConfig) -> Result<CreateOutcome, AdminError> {
    let name = config.database_name();
    let quoted = quote_identifier(name)?;
    let mut conn = connect_maintenance(config).await?;

    let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(name)
        .fetch_optional(&mut conn)
        .await?;

    let outcome = if exists.is_some() {
        tracing::info!(database = name, "database already exists");
        CreateOutcome::AlreadyExists
    } else {
        sqlx::raw_sql(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = name, "database created");
        CreateOutcome::Created
    };

    conn.close().await?;
    Ok(outcome)
}

/// Terminate other sessions on the configured database, then drop it.
///
/// Callers are responsible for the production guard and confirmation.
pub async fn drop_database(config: &DbConfig) -> Result<(), AdminError> {
    let name = config.database_name();
    let quoted = quote_identifier(name)?;
    let mut conn = connect_maintenance(config).await?;

    let terminated = sqlx::query(
        r#"
        SELECT pg_terminate_backend(pg_stat_activity.pid)
        FROM pg_stat_activity
        WHERE pg_stat_activity.datname = $1
          AND pid <> pg_backend_pid()
        "#,
    )
    .bind(name)
    .execute(&mut conn)
    .await?;
    tracing::debug!(
        database = name,
        sessions = terminated.rows_affected(),
        "terminated sessions"
    );

    sqlx::raw_sql(&format!("DROP DATABASE IF EXISTS {}", quoted))
        .execute(&mut conn)
        .await?;
    tracing::info!(database = name, "database dropped");

    conn.close().await?;
    Ok(())
}

/// `<db>_<UTC timestamp>.sql`, with `:` and `.` kept out of the timestamp.
pub fn backup_file_name(database: &str, at: chrono::DateTime<Utc>) -> String {
    format!("{}_{}.sql", database, at.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}

/// Dump the configured database with `pg_dump` into `out_dir`.
///
/// The dump uses `INSERT` statements so [`restore_backup`] can replay it
/// without `COPY ... FROM stdin` support. Returns the written file.
pub async fn backup_database(config: &DbConfig, out_dir: &Path) -> Result<PathBuf, AdminError> {
    let name = config.database_name();
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| AdminError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;
    let file = out_dir.join(backup_file_name(name, Utc::now()));

    tracing::info!(database = name, "creating backup");
    let output = Command::new("pg_dump")
        .arg(config.connection_url())
        .args(["--no-owner", "--no-acl", "--inserts"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AdminError::ExternalTool {
            tool: "pg_dump",
            message: if e.kind() == std::io::ErrorKind::NotFound {
                "pg_dump not found on PATH".to_string()
            } else {
                e.to_string()
            },
        })?
        .wait_with_output()
        .await
        .map_err(|e| AdminError::ExternalTool {
            tool: "pg_dump",
            message: e.to_string(),
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(AdminError::ExternalTool {
            tool: "pg_dump",
            message: stderr.trim().to_string(),
        });
    }
    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        tracing::warn!("pg_dump: {}", line);
    }

    tokio::fs::write(&file, &output.stdout)
        .await
        .map_err(|source| AdminError::Io {
            path: file.clone(),
            source,
        })?;
    tracing::info!(path = %file.display(), bytes = output.stdout.len(), "backup written");
    Ok(file)
}

/// Drop psql meta-command lines (`\restrict`, `\unrestrict`, `\connect`).
///
/// The server only understands SQL; recent `pg_dump` releases wrap plain
/// dumps in `\restrict <key>` / `\unrestrict <key>`.
pub fn strip_meta_commands(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    for line in sql.lines() {
        if line.starts_with('\\') {
            tracing::debug!(line, "skipping psql meta-command");
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Replay a plain SQL dump inside a single transaction.
///
/// The dump has no `DROP` statements, so the target must be a fresh database.
/// Any failing statement rolls the whole file back.
pub async fn restore_backup(pool: &PgPool, file: &Path) -> Result<(), AdminError> {
    let sql = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| AdminError::Io {
            path: file.to_path_buf(),
            source,
        })?;
    let sql = strip_meta_commands(&sql);

    tracing::info!(path = %file.display(), "restoring backup");
    let mut tx = pool.begin().await?;
    sqlx::raw_sql(&sql).execute(&mut *tx).await?;
    tx.commit().await?;
    tracing::info!("backup restored");
    Ok(())
}
