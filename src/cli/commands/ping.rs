use crate::cli::commands::{acting_agent, open_pool, request_time};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::pinger::PingLogic;
use crate::errors::AppResult;
use crate::models::coordinate::Coordinate;
use crate::ui::messages::success;
use crate::utils::formatting::format_coord;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Ping { lat, lng } = &cli.command else {
        return Ok(());
    };

    let mut pool = open_pool(cfg)?;
    let agent = acting_agent(cli, &pool)?;
    let position = Coordinate::parse(lat, lng)?;

    let sample = PingLogic::ping(&mut pool, &agent, position, request_time(cli)?, cfg)?;

    success(format!(
        "Ping #{} stored at {} (next in {}s).",
        sample.id,
        format_coord(&sample.position),
        cfg.ping_interval_secs
    ));
    Ok(())
}
