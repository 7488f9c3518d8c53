//! PostgreSQL connection pool management

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::repository::{RepositoryError, RepositoryOperation};

/// Create a PostgreSQL connection pool, retrying with exponential backoff
///
/// Makes `max_retries + 1` attempts; the delay starts at `retry_delay_secs`
/// and doubles after every failure.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let mut attempt = 0;

    loop {
        match try_create_pool(config).await {
            Ok(pool) => {
                if attempt > 0 {
                    tracing::info!(
                        "Database connection established after {} attempt(s)",
                        attempt + 1
                    );
                } else {
                    tracing::info!(
                        "Database connection pool created: max={}, min={}",
                        config.max_connections,
                        config.min_connections
                    );
                }
                return Ok(pool);
            }
            Err(e) => {
                attempt += 1;

                if attempt > config.max_retries {
                    tracing::error!(
                        "Failed to connect to database after {} attempts: {}",
                        config.max_retries + 1,
                        e
                    );
                    return Err(e.into());
                }

                let delay = backoff_delay(config.retry_delay(), attempt);
                tracing::warn!(
                    "Database connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn try_create_pool(config: &DatabaseConfig) -> std::result::Result<PgPool, RepositoryError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connection_timeout())
        .connect(&config.url)
        .await
        .map_err(|e| {
            RepositoryError::connection_failed(
                RepositoryOperation::Connect,
                format!(
                    "Failed to connect to database at '{}': {} ({})",
                    sanitize_connection_url(&config.url),
                    categorize_db_error(&e),
                    e
                ),
            )
        })
}

/// Delay before retry number `attempt` (1-based)
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let multiplier = 2_u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(multiplier)
}

/// Sanitize connection URL for safe logging (remove password)
fn sanitize_connection_url(url: &str) -> String {
    if let (Some(scheme_end), Some(at_pos)) = (url.find("://"), url.rfind('@')) {
        let credentials_start = scheme_end + 3;
        if at_pos > credentials_start {
            if let Some(colon) = url[credentials_start..at_pos].find(':') {
                let username = &url[credentials_start..credentials_start + colon];
                return format!("{}{}:***{}", &url[..credentials_start], username, &url[at_pos..]);
            }
        }
    }
    url.to_string()
}

fn categorize_db_error(err: &sqlx::Error) -> &'static str {
    use sqlx::Error;
    match err {
        Error::Configuration(_) => "Configuration error",
        Error::Database(_) => "Database query error",
        Error::Io(_) => "Network I/O error - check connectivity",
        Error::Tls(_) => "TLS/SSL error - check certificate configuration",
        Error::PoolTimedOut => "Connection pool timeout - database may be overloaded",
        Error::PoolClosed => "Connection pool closed",
        Error::WorkerCrashed => "Database worker crashed",
        _ => "Connection error",
    }
}
