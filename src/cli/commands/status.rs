use crate::cli::commands::agent::print_agent;
use crate::cli::commands::{acting_agent, open_pool};
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;

/// Show the duty state of the agent behind `--token`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let agent = acting_agent(cli, &pool)?;
    print_agent(&agent);
    Ok(())
}
