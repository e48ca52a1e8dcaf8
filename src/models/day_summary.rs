use crate::core::calculator::sessions::DutySession;
use serde::Serialize;

#[derive(Debug, Default, Clone, Serialize)]
pub struct DaySummary {
    pub sessions: Vec<DutySession>,
    pub on_duty_minutes: i64,
    pub distance_m: f64,
    pub shop_visits: usize,
    pub sample_count: usize,
}
