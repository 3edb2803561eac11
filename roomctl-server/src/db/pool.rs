//! Database connection pool management
//!
//! The pool is built once by the entry point and passed by reference to
//! repositories and runners. One-shot commands call [`close_pool`] when done.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use roomctl_core::DbConfig;

/// Connection options for the configured target database.
///
/// `DATABASE_URL` wins; otherwise the discrete host/port/user fields are used.
pub fn connect_options(config: &DbConfig) -> Result<PgConnectOptions, sqlx::Error> {
    match &config.url {
        Some(url) => url.parse(),
        None => Ok(PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password)),
    }
}

/// Create a PostgreSQL connection pool.
///
/// Pool bounds come from `DB_POOL_MIN` / `DB_POOL_MAX`; idle connections are
/// reaped after 30 seconds and acquiring a connection gives up after 2.
///
/// # Errors
///
/// Returns an error if the options are invalid or the first connection fails.
///
/// # Example
///
/// ```ignore
/// let config = AppConfig::from_env()?;
/// let pool = create_pool(&config.db).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(config)?;
    tracing::debug!(
        min = config.pool_min,
        max = config.pool_max,
        "creating database pool"
    );

    PgPoolOptions::new()
        .min_connections(config.pool_min)
        .max_connections(config.pool_max)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.connect_timeout)
        .connect_with(options)
        .await
}

/// Drain and close the pool.
pub async fn close_pool(pool: PgPool) {
    pool.close().await;
    tracing::debug!("database pool closed");
}

/// Connectivity check (`SELECT NOW()`).
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT NOW()").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_fields_become_connect_options() {
        let config = DbConfig {
            host: "db.internal".into(),
            port: 6543,
            name: "rooms".into(),
            ..DbConfig::default()
        };
        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("rooms"));
    }

    #[test]
    fn database_url_is_parsed() {
        let config = DbConfig {
            url: Some("postgres://app:pw@remote:5433/bookings".into()),
            ..DbConfig::default()
        };
        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "remote");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_username(), "app");
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p roomctl-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let config = DbConfig {
            url: Some(url),
            ..DbConfig::default()
        };
        let pool = create_pool(&config).await.expect("pool creation failed");

        ping(&pool).await.expect("ping failed");
        close_pool(pool).await;
    }
}
