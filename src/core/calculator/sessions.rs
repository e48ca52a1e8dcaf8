use crate::models::checkpoint::{Checkpoint, CheckpointDetail, CheckpointKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One duty session reconstructed from checkpoints. Either side can be
/// missing: an END with no START (orphan end) or a START still open.
#[derive(Debug, Clone, Serialize)]
pub struct DutySession {
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub auto_closed: bool,
    pub duration_minutes: i64,
}

impl DutySession {
    pub fn is_open(&self) -> bool {
        self.started_at.is_some() && self.ended_at.is_none()
    }
}

/// Pair duty checkpoints into sessions.
///
/// - each DUTY_START opens a session; a START while one is already open
///   closes nothing and is folded into the open session
/// - a DUTY_END closes the open session, or becomes an orphan session
/// - SHOP_VISIT checkpoints are ignored
///
/// `checkpoints` must be ascending by time (as the day view returns them).
pub fn build_sessions(checkpoints: &[Checkpoint]) -> Vec<DutySession> {
    let mut sessions: Vec<DutySession> = Vec::new();

    for cp in checkpoints {
        match cp.kind() {
            CheckpointKind::DutyStart => {
                if sessions.last().is_some_and(DutySession::is_open) {
                    continue;
                }
                sessions.push(DutySession {
                    started_at: Some(cp.recorded_at),
                    ended_at: None,
                    auto_closed: false,
                    duration_minutes: 0,
                });
            }
            CheckpointKind::DutyEnd => {
                let auto_closed =
                    matches!(cp.detail, CheckpointDetail::DutyEnd { auto_closed: true });

                if let Some(last) = sessions.last_mut()
                    && last.is_open()
                {
                    last.ended_at = Some(cp.recorded_at);
                    last.auto_closed = auto_closed;
                    if let Some(start) = last.started_at {
                        last.duration_minutes = (cp.recorded_at - start).num_minutes();
                    }
                    continue;
                }

                sessions.push(DutySession {
                    started_at: None,
                    ended_at: Some(cp.recorded_at),
                    auto_closed,
                    duration_minutes: 0,
                });
            }
            CheckpointKind::ShopVisit => {}
        }
    }

    sessions
}

/// Minutes on duty across closed sessions.
pub fn total_minutes(sessions: &[DutySession]) -> i64 {
    sessions.iter().map(|s| s.duration_minutes).sum()
}
