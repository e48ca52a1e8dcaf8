//! Agent and token queries.

use crate::errors::{AppError, AppResult};
use crate::models::agent::Agent;
use crate::models::coordinate::Coordinate;
use crate::models::duty_status::DutyStatus;
use crate::utils::time::{from_db_ts, to_db_ts};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const AGENT_COLUMNS: &str = "id, name, status, active, last_lat, last_lng, last_seen_at,
     duty_started_at, duty_start_lat, duty_start_lng,
     duty_ended_at, duty_end_lat, duty_end_lng, created_at";

/// Wrap a domain parse failure into the error type rusqlite row mappers expect.
pub(crate) fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

pub(crate) fn ts_column(row: &Row, name: &str) -> Result<DateTime<Utc>> {
    let raw: String = row.get(name)?;
    from_db_ts(&raw).map_err(|e| conversion_error(0, e))
}

pub(crate) fn opt_ts_column(row: &Row, name: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(name)?;
    raw.map(|s| from_db_ts(&s).map_err(|e| conversion_error(0, e)))
        .transpose()
}

fn opt_coord(row: &Row, lat: &str, lng: &str) -> Result<Option<Coordinate>> {
    let lat: Option<f64> = row.get(lat)?;
    let lng: Option<f64> = row.get(lng)?;
    Ok(match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinate { lat, lng }),
        _ => None,
    })
}

pub fn map_agent(row: &Row) -> Result<Agent> {
    let status_str: String = row.get("status")?;
    let status = DutyStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(
            0,
            AppError::Validation(format!("Invalid duty status: {}", status_str)),
        )
    })?;

    Ok(Agent {
        id: row.get("id")?,
        name: row.get("name")?,
        status,
        active: row.get::<_, i32>("active")? == 1,
        last_position: opt_coord(row, "last_lat", "last_lng")?,
        last_seen_at: opt_ts_column(row, "last_seen_at")?,
        duty_started_at: opt_ts_column(row, "duty_started_at")?,
        duty_start_position: opt_coord(row, "duty_start_lat", "duty_start_lng")?,
        duty_ended_at: opt_ts_column(row, "duty_ended_at")?,
        duty_end_position: opt_coord(row, "duty_end_lat", "duty_end_lng")?,
        created_at: ts_column(row, "created_at")?,
    })
}

pub fn insert_agent(conn: &Connection, name: &str, at: &DateTime<Utc>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO agents (name, status, active, created_at) VALUES (?1, 'OFF_DUTY', 1, ?2)",
        params![name, to_db_ts(at)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_agent(conn: &Connection, id: i64) -> AppResult<Option<Agent>> {
    let sql = format!("SELECT {AGENT_COLUMNS} FROM agents WHERE id = ?1");
    let agent = conn.query_row(&sql, [id], map_agent).optional()?;
    Ok(agent)
}

/// Like [`find_agent`] but a missing row is `NotFound`.
pub fn load_agent(conn: &Connection, id: i64) -> AppResult<Agent> {
    find_agent(conn, id)?.ok_or_else(|| AppError::NotFound(format!("agent {id}")))
}

pub fn list_agents(conn: &Connection, include_inactive: bool) -> AppResult<Vec<Agent>> {
    let sql = if include_inactive {
        format!("SELECT {AGENT_COLUMNS} FROM agents ORDER BY id ASC")
    } else {
        format!("SELECT {AGENT_COLUMNS} FROM agents WHERE active = 1 ORDER BY id ASC")
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_agent)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Active agents currently ON_DUTY, candidates for the stale-session sweep.
pub fn list_on_duty(conn: &Connection) -> AppResult<Vec<Agent>> {
    let sql = format!(
        "SELECT {AGENT_COLUMNS} FROM agents
         WHERE active = 1 AND status = 'ON_DUTY'
         ORDER BY id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_agent)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Persist a duty transition. Returns the number of rows touched (0 = agent gone).
pub fn update_duty_start(
    conn: &Connection,
    agent_id: i64,
    pos: &Coordinate,
    at: &DateTime<Utc>,
) -> AppResult<usize> {
    let ts = to_db_ts(at);
    let n = conn.execute(
        "UPDATE agents
         SET status = 'ON_DUTY',
             duty_started_at = ?1, duty_start_lat = ?2, duty_start_lng = ?3,
             last_lat = ?2, last_lng = ?3
         WHERE id = ?4",
        params![ts, pos.lat, pos.lng, agent_id],
    )?;
    Ok(n)
}

pub fn update_duty_end(
    conn: &Connection,
    agent_id: i64,
    pos: &Coordinate,
    at: &DateTime<Utc>,
) -> AppResult<usize> {
    let ts = to_db_ts(at);
    let n = conn.execute(
        "UPDATE agents
         SET status = 'OFF_DUTY',
             duty_ended_at = ?1, duty_end_lat = ?2, duty_end_lng = ?3,
             last_lat = ?2, last_lng = ?3
         WHERE id = ?4",
        params![ts, pos.lat, pos.lng, agent_id],
    )?;
    Ok(n)
}

/// Record the latest known position. With `force_on_duty` the agent is also
/// switched to ON_DUTY.
pub fn update_last_seen(
    conn: &Connection,
    agent_id: i64,
    pos: &Coordinate,
    at: &DateTime<Utc>,
    force_on_duty: bool,
) -> AppResult<usize> {
    let sql = if force_on_duty {
        "UPDATE agents
         SET last_lat = ?1, last_lng = ?2, last_seen_at = ?3, status = 'ON_DUTY'
         WHERE id = ?4"
    } else {
        "UPDATE agents
         SET last_lat = ?1, last_lng = ?2, last_seen_at = ?3
         WHERE id = ?4"
    };
    let n = conn.execute(sql, params![pos.lat, pos.lng, to_db_ts(at), agent_id])?;
    Ok(n)
}

pub fn set_active(conn: &Connection, agent_id: i64, active: bool) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE agents SET active = ?1 WHERE id = ?2",
        params![if active { 1 } else { 0 }, agent_id],
    )?;
    Ok(n)
}

// ---------------------------
// Tokens
// ---------------------------

pub fn insert_token(
    conn: &Connection,
    agent_id: i64,
    token: &str,
    at: &DateTime<Utc>,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO agent_tokens (token, agent_id, created_at) VALUES (?1, ?2, ?3)",
        params![token, agent_id, to_db_ts(at)],
    )?;
    Ok(())
}

pub fn delete_tokens_for(conn: &Connection, agent_id: i64) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM agent_tokens WHERE agent_id = ?1", [agent_id])?;
    Ok(n)
}

/// Resolve a bearer token to the agent id it was issued for.
pub fn agent_id_for_token(conn: &Connection, token: &str) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT agent_id FROM agent_tokens WHERE token = ?1",
            [token],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id)
}
