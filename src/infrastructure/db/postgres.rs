use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::OnceCell;
use tracing::info;
use std::time::Duration;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    info!("Database connection established.");
    Ok(pool)
}

/// Returns the process-wide pool, connecting on first use.
///
/// Concurrent first callers wait on a single connection attempt. A failed
/// attempt is not cached, so a later request may try again.
pub async fn get_connection(database_url: &str) -> Result<&'static PgPool, sqlx::Error> {
    POOL.get_or_try_init(|| async {
        let pool = create_pool(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok::<_, sqlx::Error>(pool)
    })
    .await
}
