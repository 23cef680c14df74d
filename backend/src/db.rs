use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use tokio::task;

use crate::error::ApiError;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the process-wide bounded connection pool. Initialized once at
/// startup and shared through the router state; individual operations
/// check a connection out and the pool reclaims it when the guard drops,
/// on success and error paths alike.
pub fn init_pool(database_url: &str, max_size: u32) -> Result<DbPool, Box<dyn std::error::Error>> {
    log::info!("Creating database connection pool (max {})", max_size);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| format!("Failed to create connection pool: {}", e))?;
    Ok(pool)
}

/// Startup sanity check against the store.
pub fn check_connectivity(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = pool.get()?;
    let test_query: i32 =
        diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1")).get_result(&mut conn)?;
    log::info!("Database test query result: {}", test_query);
    Ok(())
}

/// Checks a connection out of the pool and runs `f` on the blocking
/// thread pool, keeping diesel's synchronous I/O off the async executor.
pub async fn run_blocking<F, T>(pool: &DbPool, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|e| ApiError::Store(format!("connection pool: {}", e)))?;
        f(&mut conn)
    })
    .await
    .map_err(|e| ApiError::Store(format!("blocking task: {}", e)))?
}
