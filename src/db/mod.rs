mod from_row;
mod schema;
pub mod queries;

pub use schema::init_db;

use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::config::AppEnv;
use crate::error::Result;
use crate::identity::PasswordHasher;
use crate::jwt::TokenService;
use crate::rate_limit::RateLimitGate;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Document store (accounts, profiles, recipes, ingredients, reviews, favorites)
    pub db: DbPool,
    pub env: AppEnv,
    /// Derive client identity from proxy headers instead of the peer address
    pub trust_proxy: bool,
    pub tokens: TokenService,
    pub hasher: PasswordHasher,
    pub rate_limiter: Arc<RateLimitGate>,
}

pub fn create_pool(database_path: &str) -> std::result::Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
    });
    Pool::builder().max_size(10).build(manager)
}

/// Single-connection in-memory pool with the schema applied.
///
/// Each SQLite `:memory:` connection is its own database, so the pool is
/// capped at one connection.
pub fn create_memory_pool() -> Result<DbPool> {
    memory_pool_with(init_db)
}

fn memory_pool_with(schema: fn(&Connection) -> rusqlite::Result<()>) -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = Pool::builder().max_size(1).build(manager)?;
    schema(&*pool.get()?)?;
    Ok(pool)
}
