use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

/// One schema step. Applied steps are recorded in `log` as
/// `migration_applied` rows with the version as target.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20251001_0001_tracking_schema",
        description: "Created agents, tokens, location samples and checkpoints",
        sql: r#"
        CREATE TABLE IF NOT EXISTS agents (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            name              TEXT NOT NULL,
            status            TEXT NOT NULL DEFAULT 'OFF_DUTY' CHECK(status IN ('ON_DUTY','OFF_DUTY')),
            active            INTEGER NOT NULL DEFAULT 1,
            last_lat          REAL,
            last_lng          REAL,
            last_seen_at      TEXT,
            duty_started_at   TEXT,
            duty_start_lat    REAL,
            duty_start_lng    REAL,
            duty_ended_at     TEXT,
            duty_end_lat      REAL,
            duty_end_lng      REAL,
            created_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS agent_tokens (
            token       TEXT PRIMARY KEY,
            agent_id    INTEGER NOT NULL REFERENCES agents(id),
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS location_samples (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            agent_id     INTEGER NOT NULL REFERENCES agents(id),
            lat          REAL NOT NULL,
            lng          REAL NOT NULL,
            recorded_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS checkpoints (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            agent_id     INTEGER NOT NULL REFERENCES agents(id),
            kind         TEXT NOT NULL CHECK(kind IN ('DUTY_START','DUTY_END','SHOP_VISIT')),
            lat          REAL NOT NULL,
            lng          REAL NOT NULL,
            recorded_at  TEXT NOT NULL,
            note         TEXT,
            shop_name    TEXT,
            photo_url    TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_tokens_agent ON agent_tokens(agent_id);
        CREATE INDEX IF NOT EXISTS idx_samples_agent_time ON location_samples(agent_id, recorded_at);
        CREATE INDEX IF NOT EXISTS idx_checkpoints_agent_time ON checkpoints(agent_id, recorded_at);
        "#,
    },
    Migration {
        version: "20251020_0002_checkpoint_auto_closed",
        description: "Added auto_closed flag to checkpoints",
        sql: "ALTER TABLE checkpoints ADD COLUMN auto_closed INTEGER NOT NULL DEFAULT 0;",
    },
];

/// Ensure that the `log` table exists. It doubles as the migration ledger.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;
    Ok(())
}

/// Public entry point: run all pending migrations, oldest first.
/// Returns how many were applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            debug!(version = m.version, "migration already applied");
            continue;
        }

        apply(conn, m)?;
        info!(version = m.version, description = m.description, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
