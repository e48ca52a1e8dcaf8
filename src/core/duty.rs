use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{load_agent, update_duty_end, update_duty_start};
use crate::db::trail::insert_checkpoint;
use crate::errors::{AppError, AppResult};
use crate::models::agent::Agent;
use crate::models::checkpoint::{Checkpoint, CheckpointDetail};
use crate::models::coordinate::Coordinate;
use crate::models::duty_status::DutyStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of a duty start/end call.
///
/// Transitions are idempotent on the status: starting an ON_DUTY agent or
/// ending an OFF_DUTY one is accepted (client retries are common), reported
/// with `changed() == false`, and still appends its checkpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DutyTransition {
    pub previous: DutyStatus,
    pub current: DutyStatus,
    pub checkpoint: Checkpoint,
}

impl DutyTransition {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

pub struct DutyLogic;

impl DutyLogic {
    pub fn start(
        pool: &mut DbPool,
        agent: &Agent,
        position: Coordinate,
        at: DateTime<Utc>,
    ) -> AppResult<DutyTransition> {
        Self::transition(pool, agent, DutyStatus::OnDuty, position, at, false)
    }

    pub fn end(
        pool: &mut DbPool,
        agent: &Agent,
        position: Coordinate,
        at: DateTime<Utc>,
    ) -> AppResult<DutyTransition> {
        Self::transition(pool, agent, DutyStatus::OffDuty, position, at, false)
    }

    /// Shared path for manual and sweep-driven transitions. The agent update
    /// and the checkpoint append commit together or not at all.
    pub(crate) fn transition(
        pool: &mut DbPool,
        agent: &Agent,
        target: DutyStatus,
        position: Coordinate,
        at: DateTime<Utc>,
        auto_closed: bool,
    ) -> AppResult<DutyTransition> {
        let (detail, op) = match target {
            DutyStatus::OnDuty => (CheckpointDetail::DutyStart, "duty_start"),
            DutyStatus::OffDuty => (CheckpointDetail::DutyEnd { auto_closed }, "duty_end"),
        };

        let transition = pool.with_tx(|tx| {
            // Re-read inside the transaction: the caller's copy may be stale.
            let previous = load_agent(tx, agent.id)?.status;

            let touched = match target {
                DutyStatus::OnDuty => update_duty_start(tx, agent.id, &position, &at)?,
                DutyStatus::OffDuty => update_duty_end(tx, agent.id, &position, &at)?,
            };
            if touched == 0 {
                return Err(AppError::NotFound(format!("agent {}", agent.id)));
            }

            let note = auto_closed.then(|| "Auto-ended after ping timeout".to_string());
            let checkpoint =
                insert_checkpoint(tx, &Checkpoint::new(agent.id, position, at, note, detail))?;

            let message = if previous == target {
                format!("Redundant {} (already {})", op, previous.label())
            } else {
                format!("{} → {} at {:.6},{:.6}", previous.label(), target.label(), position.lat, position.lng)
            };
            audit(tx, op, &agent.id.to_string(), &message)?;

            Ok(DutyTransition {
                previous,
                current: target,
                checkpoint,
            })
        })?;

        if transition.changed() {
            info!(agent_id = agent.id, op, auto_closed, "duty transition");
        } else {
            warn!(
                agent_id = agent.id,
                op,
                status = transition.current.to_db_str(),
                "redundant duty call accepted"
            );
        }

        Ok(transition)
    }
}
