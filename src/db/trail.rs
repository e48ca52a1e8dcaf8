//! Append-only trail tables: location samples and checkpoints.

use crate::db::queries::{conversion_error, ts_column};
use crate::errors::{AppError, AppResult};
use crate::models::checkpoint::{Checkpoint, CheckpointDetail, CheckpointKind};
use crate::models::coordinate::Coordinate;
use crate::models::location_sample::LocationSample;
use crate::utils::time::to_db_ts;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result, Row, params};

pub fn map_sample(row: &Row) -> Result<LocationSample> {
    Ok(LocationSample {
        id: row.get("id")?,
        agent_id: row.get("agent_id")?,
        position: Coordinate {
            lat: row.get("lat")?,
            lng: row.get("lng")?,
        },
        recorded_at: ts_column(row, "recorded_at")?,
    })
}

pub fn map_checkpoint(row: &Row) -> Result<Checkpoint> {
    let kind_str: String = row.get("kind")?;
    let kind = CheckpointKind::from_db_str(&kind_str).ok_or_else(|| {
        conversion_error(
            0,
            AppError::Validation(format!("Invalid checkpoint kind: {}", kind_str)),
        )
    })?;

    let detail = match kind {
        CheckpointKind::DutyStart => CheckpointDetail::DutyStart,
        CheckpointKind::DutyEnd => CheckpointDetail::DutyEnd {
            auto_closed: row.get::<_, i32>("auto_closed")? == 1,
        },
        CheckpointKind::ShopVisit => CheckpointDetail::ShopVisit {
            shop_name: row.get::<_, Option<String>>("shop_name")?.unwrap_or_default(),
            photo_url: row.get::<_, Option<String>>("photo_url")?.unwrap_or_default(),
        },
    };

    Ok(Checkpoint {
        id: row.get("id")?,
        agent_id: row.get("agent_id")?,
        position: Coordinate {
            lat: row.get("lat")?,
            lng: row.get("lng")?,
        },
        recorded_at: ts_column(row, "recorded_at")?,
        note: row.get("note")?,
        detail,
    })
}

pub fn insert_sample(
    conn: &Connection,
    agent_id: i64,
    pos: &Coordinate,
    at: &DateTime<Utc>,
) -> AppResult<LocationSample> {
    conn.execute(
        "INSERT INTO location_samples (agent_id, lat, lng, recorded_at) VALUES (?1, ?2, ?3, ?4)",
        params![agent_id, pos.lat, pos.lng, to_db_ts(at)],
    )?;

    Ok(LocationSample {
        id: conn.last_insert_rowid(),
        agent_id,
        position: *pos,
        recorded_at: *at,
    })
}

/// Insert a checkpoint and return it with its assigned id.
pub fn insert_checkpoint(conn: &Connection, cp: &Checkpoint) -> AppResult<Checkpoint> {
    let (shop_name, photo_url, auto_closed) = match &cp.detail {
        CheckpointDetail::DutyStart => (None, None, false),
        CheckpointDetail::DutyEnd { auto_closed } => (None, None, *auto_closed),
        CheckpointDetail::ShopVisit {
            shop_name,
            photo_url,
        } => (Some(shop_name.as_str()), Some(photo_url.as_str()), false),
    };

    conn.execute(
        "INSERT INTO checkpoints (agent_id, kind, lat, lng, recorded_at, note, shop_name, photo_url, auto_closed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            cp.agent_id,
            cp.kind().to_db_str(),
            cp.position.lat,
            cp.position.lng,
            to_db_ts(&cp.recorded_at),
            cp.note,
            shop_name,
            photo_url,
            if auto_closed { 1 } else { 0 },
        ],
    )?;

    let mut stored = cp.clone();
    stored.id = conn.last_insert_rowid();
    Ok(stored)
}

/// Samples for one agent inside `[from, to)`, oldest first.
pub fn load_samples_between(
    conn: &Connection,
    agent_id: i64,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> AppResult<Vec<LocationSample>> {
    let mut stmt = conn.prepare(
        "SELECT id, agent_id, lat, lng, recorded_at FROM location_samples
         WHERE agent_id = ?1 AND recorded_at >= ?2 AND recorded_at < ?3
         ORDER BY recorded_at ASC, id ASC",
    )?;

    let rows = stmt.query_map(
        params![agent_id, to_db_ts(from), to_db_ts(to)],
        map_sample,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Checkpoints for one agent inside `[from, to)`, oldest first.
pub fn load_checkpoints_between(
    conn: &Connection,
    agent_id: i64,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> AppResult<Vec<Checkpoint>> {
    let mut stmt = conn.prepare(
        "SELECT id, agent_id, kind, lat, lng, recorded_at, note, shop_name, photo_url, auto_closed
         FROM checkpoints
         WHERE agent_id = ?1 AND recorded_at >= ?2 AND recorded_at < ?3
         ORDER BY recorded_at ASC, id ASC",
    )?;

    let rows = stmt.query_map(
        params![agent_id, to_db_ts(from), to_db_ts(to)],
        map_checkpoint,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_checkpoints(conn: &Connection, agent_id: i64) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM checkpoints WHERE agent_id = ?1",
        [agent_id],
        |row| row.get(0),
    )?;
    Ok(n)
}
