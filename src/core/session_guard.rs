use crate::db::queries::{agent_id_for_token, find_agent};
use crate::errors::{AppError, AppResult};
use crate::models::agent::Agent;
use rusqlite::Connection;
use tracing::debug;

/// Resolves bearer credentials to agents. Read-only.
pub struct SessionGuard;

impl SessionGuard {
    /// Accepts either the bare token or an `Authorization` style
    /// `Bearer <token>` value.
    pub fn authenticate(conn: &Connection, credential: Option<&str>) -> AppResult<Agent> {
        let token = credential
            .map(strip_bearer)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("missing credential".into()))?;

        let agent_id = agent_id_for_token(conn, token)?
            .ok_or_else(|| AppError::Unauthorized("unknown credential".into()))?;

        // A token row pointing at a vanished agent is treated like a bad token.
        let agent = find_agent(conn, agent_id)?
            .ok_or_else(|| AppError::Unauthorized("unknown credential".into()))?;

        if !agent.active {
            return Err(AppError::Unauthorized(format!(
                "agent {} is deactivated",
                agent.id
            )));
        }

        debug!(agent_id = agent.id, "credential accepted");
        Ok(agent)
    }
}

fn strip_bearer(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed[7..].trim(),
        _ => trimmed,
    }
}
