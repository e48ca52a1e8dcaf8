pub mod agent;
pub mod config;
pub mod day;
pub mod duty;
pub mod init;
pub mod log;
pub mod ping;
pub mod status;
pub mod sweep;
pub mod visit;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::session_guard::SessionGuard;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::agent::Agent;
use crate::utils::time::parse_timestamp;
use chrono::{DateTime, Utc};

/// Environment fallback for `--token`.
pub const TOKEN_ENV: &str = "FIXTRACK_TOKEN";

/// Open the configured database with the schema brought up to date.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

/// Request time: `--at` when given, the wall clock otherwise.
pub(crate) fn request_time(cli: &Cli) -> AppResult<DateTime<Utc>> {
    match &cli.at {
        Some(raw) => parse_timestamp(raw),
        None => Ok(Utc::now()),
    }
}

/// Resolve the acting agent from `--token` or `FIXTRACK_TOKEN`.
pub(crate) fn acting_agent(cli: &Cli, pool: &DbPool) -> AppResult<Agent> {
    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var(TOKEN_ENV).ok());
    SessionGuard::authenticate(&pool.conn, token.as_deref())
}
