use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{
    delete_tokens_for, insert_agent, insert_token, list_agents, load_agent, set_active,
};
use crate::errors::{AppError, AppResult};
use crate::models::agent::Agent;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

/// Agent administration: registration, credential issuing, deactivation.
pub struct AgentLogic;

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

impl AgentLogic {
    /// Register a field agent and issue its first credential.
    pub fn register(pool: &mut DbPool, name: &str, at: DateTime<Utc>) -> AppResult<(Agent, String)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Agent name must not be blank".into()));
        }

        let token = new_token();
        let agent = pool.with_tx(|tx| {
            let id = insert_agent(tx, name, &at)?;
            insert_token(tx, id, &token, &at)?;
            audit(tx, "agent_register", &id.to_string(), &format!("Registered agent '{name}'"))?;
            load_agent(tx, id)
        })?;

        info!(agent_id = agent.id, "agent registered");
        Ok((agent, token))
    }

    pub fn get(pool: &DbPool, id: i64) -> AppResult<Agent> {
        load_agent(&pool.conn, id)
    }

    pub fn list(pool: &DbPool, include_inactive: bool) -> AppResult<Vec<Agent>> {
        list_agents(&pool.conn, include_inactive)
    }

    /// Agents are never deleted; deactivation revokes access and hides them
    /// from the default listing. History stays queryable.
    pub fn deactivate(pool: &mut DbPool, id: i64) -> AppResult<Agent> {
        pool.with_tx(|tx| {
            if set_active(tx, id, false)? == 0 {
                return Err(AppError::NotFound(format!("agent {id}")));
            }
            audit(tx, "agent_deactivate", &id.to_string(), "Agent deactivated")?;
            load_agent(tx, id)
        })
    }

    pub fn reactivate(pool: &mut DbPool, id: i64) -> AppResult<Agent> {
        pool.with_tx(|tx| {
            if set_active(tx, id, true)? == 0 {
                return Err(AppError::NotFound(format!("agent {id}")));
            }
            audit(tx, "agent_reactivate", &id.to_string(), "Agent reactivated")?;
            load_agent(tx, id)
        })
    }

    /// Revoke every credential of the agent and issue a fresh one.
    pub fn rotate_token(pool: &mut DbPool, id: i64, at: DateTime<Utc>) -> AppResult<String> {
        let token = new_token();
        pool.with_tx(|tx| {
            load_agent(tx, id)?;
            let revoked = delete_tokens_for(tx, id)?;
            insert_token(tx, id, &token, &at)?;
            audit(
                tx,
                "agent_rotate_token",
                &id.to_string(),
                &format!("Revoked {revoked} credential(s), issued a new one"),
            )?;
            Ok(())
        })?;
        Ok(token)
    }
}
