use crate::cli::commands::{acting_agent, open_pool, request_time};
use crate::cli::parser::{Cli, Commands, DutyAction};
use crate::config::Config;
use crate::core::duty::DutyLogic;
use crate::errors::AppResult;
use crate::models::coordinate::Coordinate;
use crate::ui::messages::{success, warning};
use crate::utils::formatting::format_coord;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Duty { action } = &cli.command else {
        return Ok(());
    };

    let (lat, lng, starting) = match action {
        DutyAction::Start { lat, lng } => (lat, lng, true),
        DutyAction::End { lat, lng } => (lat, lng, false),
    };

    let mut pool = open_pool(cfg)?;
    let agent = acting_agent(cli, &pool)?;
    let position = Coordinate::parse(lat, lng)?;
    let at = request_time(cli)?;

    let transition = if starting {
        DutyLogic::start(&mut pool, &agent, position, at)?
    } else {
        DutyLogic::end(&mut pool, &agent, position, at)?
    };

    if !transition.changed() {
        warning(format!(
            "Agent #{} was already {}; checkpoint recorded anyway.",
            agent.id,
            transition.previous.label()
        ));
    }

    success(format!(
        "{} recorded for agent #{} at {} (checkpoint #{}).",
        transition.checkpoint.kind().to_db_str(),
        agent.id,
        format_coord(&position),
        transition.checkpoint.id
    ));
    Ok(())
}
