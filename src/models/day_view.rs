use super::{checkpoint::Checkpoint, location_sample::LocationSample};
use chrono::NaiveDate;
use serde::Serialize;

/// Everything the map client needs to draw one agent's day:
/// a polyline from `samples` and markers from `checkpoints`.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub agent_id: i64,
    pub date: NaiveDate,
    pub samples: Vec<LocationSample>,
    pub checkpoints: Vec<Checkpoint>,
}

impl DayView {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() && self.checkpoints.is_empty()
    }
}
