use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::time::Duration;
use tracing::debug;

/// Concurrent pings from the same device may hit the file at once.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Prepare a connection for tracking requests and bring the schema up to
/// date. Returns how many migrations ran.
pub fn init_db(conn: &Connection) -> AppResult<usize> {
    conn.busy_timeout(BUSY_TIMEOUT)?;

    let applied = run_pending_migrations(conn)?;
    if applied > 0 {
        debug!(applied, "schema upgraded");
    }
    Ok(applied)
}
