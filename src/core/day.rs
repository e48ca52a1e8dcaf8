use crate::core::calculator::{distance, sessions};
use crate::db::pool::DbPool;
use crate::db::queries::load_agent;
use crate::db::trail::{load_checkpoints_between, load_samples_between};
use crate::errors::AppResult;
use crate::models::checkpoint::CheckpointKind;
use crate::models::day_summary::DaySummary;
use crate::models::day_view::DayView;
use crate::utils::date::day_bounds;
use chrono::NaiveDate;
use tracing::debug;

pub struct DayLogic;

impl DayLogic {
    /// Samples and checkpoints of one agent for one local calendar day,
    /// `[start_of_day, start_of_next_day)`, oldest first. Read-only.
    pub fn view(pool: &DbPool, agent_id: i64, date: NaiveDate) -> AppResult<DayView> {
        load_agent(&pool.conn, agent_id)?;

        let (from, to) = day_bounds(date)?;
        let samples = load_samples_between(&pool.conn, agent_id, &from, &to)?;
        let checkpoints = load_checkpoints_between(&pool.conn, agent_id, &from, &to)?;

        debug!(
            agent_id,
            %date,
            samples = samples.len(),
            checkpoints = checkpoints.len(),
            "day view loaded"
        );

        Ok(DayView {
            agent_id,
            date,
            samples,
            checkpoints,
        })
    }

    pub fn summarize(view: &DayView) -> DaySummary {
        let sessions = sessions::build_sessions(&view.checkpoints);
        let on_duty_minutes = sessions::total_minutes(&sessions);

        DaySummary {
            on_duty_minutes,
            sessions,
            distance_m: distance::trail_length_m(&view.samples),
            shop_visits: view
                .checkpoints
                .iter()
                .filter(|c| c.kind() == CheckpointKind::ShopVisit)
                .count(),
            sample_count: view.samples.len(),
        }
    }
}
