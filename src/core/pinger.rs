use crate::config::Config;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{find_agent, update_last_seen};
use crate::db::trail::insert_sample;
use crate::errors::{AppError, AppResult};
use crate::models::agent::Agent;
use crate::models::coordinate::Coordinate;
use crate::models::location_sample::LocationSample;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

pub struct PingLogic;

impl PingLogic {
    /// Append one location sample and move the agent's last-known position.
    ///
    /// No rate limiting and no ordering checks: duplicated or late pings are
    /// just more rows. With `ping_resumes_duty` a ping also flips the agent
    /// back to ON_DUTY; that resume is audited as `ping_resume`.
    pub fn ping(
        pool: &mut DbPool,
        agent: &Agent,
        position: Coordinate,
        at: DateTime<Utc>,
        cfg: &Config,
    ) -> AppResult<LocationSample> {
        let (sample, resumed) = pool.with_tx(|tx| {
            // Re-read inside the transaction: the caller's copy may be stale.
            let Some(current) = find_agent(tx, agent.id)? else {
                return Err(AppError::NotFound(format!("agent {}", agent.id)));
            };
            let resumed = cfg.ping_resumes_duty && !current.status.is_on_duty();

            update_last_seen(tx, agent.id, &position, &at, cfg.ping_resumes_duty)?;
            let sample = insert_sample(tx, agent.id, &position, &at)?;
            if resumed {
                audit(tx, "ping_resume", &agent.id.to_string(), "off duty → on duty by ping")?;
            }
            Ok((sample, resumed))
        })?;

        if resumed {
            info!(agent_id = agent.id, "ping resumed duty");
        }
        debug!(agent_id = agent.id, sample_id = sample.id, "ping stored");
        Ok(sample)
    }
}
