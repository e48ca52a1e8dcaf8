use crate::core::duty::DutyLogic;
use crate::db::pool::DbPool;
use crate::db::queries::list_on_duty;
use crate::errors::{AppError, AppResult};
use crate::models::duty_status::DutyStatus;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

/// What one sweep did. Each agent is closed in its own transaction, so a
/// failure on one agent leaves the others' closures committed.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub closed: Vec<i64>,
    pub failed: Vec<(i64, AppError)>,
}

pub struct SweepLogic;

impl SweepLogic {
    /// Close duty sessions that stopped pinging.
    ///
    /// Every active ON_DUTY agent whose last activity is older than
    /// `timeout_minutes` gets a DUTY_END (auto_closed) at its last known
    /// position. Agents with no position at all are left alone. A failing
    /// agent is reported in `failed` and the sweep moves on.
    /// `timeout_minutes == 0` disables the sweep.
    pub fn expire_stale(
        pool: &mut DbPool,
        now: DateTime<Utc>,
        timeout_minutes: u32,
    ) -> AppResult<SweepReport> {
        let mut report = SweepReport::default();
        if timeout_minutes == 0 {
            debug!("session timeout disabled, sweep skipped");
            return Ok(report);
        }

        let cutoff = now - Duration::minutes(i64::from(timeout_minutes));

        for agent in list_on_duty(&pool.conn)? {
            let Some(last) = agent.last_activity() else {
                continue;
            };
            if last >= cutoff {
                continue;
            }
            let Some(position) = agent.last_position.or(agent.duty_start_position) else {
                warn!(agent_id = agent.id, "stale session without position, skipped");
                continue;
            };

            match DutyLogic::transition(pool, &agent, DutyStatus::OffDuty, position, last, true) {
                Ok(_) => report.closed.push(agent.id),
                Err(e) => {
                    warn!(agent_id = agent.id, error = %e, "auto-end failed");
                    report.failed.push((agent.id, e));
                }
            }
        }

        Ok(report)
    }
}
