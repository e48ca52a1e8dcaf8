use super::{coordinate::Coordinate, duty_status::DutyStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub status: DutyStatus,
    pub active: bool,
    pub last_position: Option<Coordinate>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub duty_started_at: Option<DateTime<Utc>>,
    pub duty_start_position: Option<Coordinate>,
    pub duty_ended_at: Option<DateTime<Utc>>,
    pub duty_end_position: Option<Coordinate>,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    /// Last moment the agent gave a sign of life: a ping, or the duty start
    /// when no ping has arrived yet.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        match (self.last_seen_at, self.duty_started_at) {
            (Some(seen), Some(started)) => Some(seen.max(started)),
            (seen, started) => seen.or(started),
        }
    }
}
