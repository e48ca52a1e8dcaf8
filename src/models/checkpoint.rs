use super::coordinate::Coordinate;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckpointKind {
    DutyStart,
    DutyEnd,
    ShopVisit,
}

impl CheckpointKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CheckpointKind::DutyStart => "DUTY_START",
            CheckpointKind::DutyEnd => "DUTY_END",
            CheckpointKind::ShopVisit => "SHOP_VISIT",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "DUTY_START" => Some(CheckpointKind::DutyStart),
            "DUTY_END" => Some(CheckpointKind::DutyEnd),
            "SHOP_VISIT" => Some(CheckpointKind::ShopVisit),
            _ => None,
        }
    }
}

/// Kind-specific payload of a checkpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckpointDetail {
    DutyStart,
    DutyEnd {
        /// Closed by the stale-session sweep instead of the agent.
        auto_closed: bool,
    },
    ShopVisit {
        shop_name: String,
        photo_url: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Checkpoint {
    pub id: i64,
    pub agent_id: i64,
    #[serde(flatten)]
    pub position: Coordinate,
    pub recorded_at: DateTime<Utc>,
    pub note: Option<String>,
    #[serde(flatten)]
    pub detail: CheckpointDetail,
}

impl Checkpoint {
    /// Checkpoint not yet written; `id` is assigned on insert.
    pub fn new(
        agent_id: i64,
        position: Coordinate,
        recorded_at: DateTime<Utc>,
        note: Option<String>,
        detail: CheckpointDetail,
    ) -> Self {
        Self {
            id: 0,
            agent_id,
            position,
            recorded_at,
            note,
            detail,
        }
    }

    pub fn kind(&self) -> CheckpointKind {
        match self.detail {
            CheckpointDetail::DutyStart => CheckpointKind::DutyStart,
            CheckpointDetail::DutyEnd { .. } => CheckpointKind::DutyEnd,
            CheckpointDetail::ShopVisit { .. } => CheckpointKind::ShopVisit,
        }
    }

    pub fn shop_name(&self) -> Option<&str> {
        match &self.detail {
            CheckpointDetail::ShopVisit { shop_name, .. } => Some(shop_name),
            _ => None,
        }
    }

    pub fn photo_url(&self) -> Option<&str> {
        match &self.detail {
            CheckpointDetail::ShopVisit { photo_url, .. } => Some(photo_url),
            _ => None,
        }
    }
}
