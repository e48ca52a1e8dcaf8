use super::coordinate::Coordinate;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One GPS reading on an agent's trail. Never updated after insert.
#[derive(Debug, Clone, Serialize)]
pub struct LocationSample {
    pub id: i64,
    pub agent_id: i64,
    #[serde(flatten)]
    pub position: Coordinate,
    pub recorded_at: DateTime<Utc>,
}
