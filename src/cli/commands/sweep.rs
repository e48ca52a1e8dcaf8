use crate::cli::commands::{open_pool, request_time};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::sweep::SweepLogic;
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Sweep { timeout } = &cli.command else {
        return Ok(());
    };

    let minutes = timeout.unwrap_or(cfg.session_timeout_minutes);
    if minutes == 0 {
        info("Session timeout is disabled (session_timeout_minutes = 0).");
        return Ok(());
    }

    let mut pool = open_pool(cfg)?;
    let report = SweepLogic::expire_stale(&mut pool, request_time(cli)?, minutes)?;

    for (id, e) in &report.failed {
        warning(format!("Could not auto-end duty for #{}: {}", id, e));
    }

    if report.closed.is_empty() && report.failed.is_empty() {
        info(format!("No duty session idle for more than {} minutes.", minutes));
        return Ok(());
    }

    let ids: Vec<String> = report.closed.iter().map(|id| format!("#{id}")).collect();
    audit(
        &pool.conn,
        "sweep",
        "",
        &format!(
            "Auto-ended {} session(s): {}; {} failed",
            report.closed.len(),
            ids.join(", "),
            report.failed.len()
        ),
    )?;
    if !report.closed.is_empty() {
        success(format!("Auto-ended duty for {}.", ids.join(", ")));
    }

    // Closures that succeeded stay committed; the exit code still reports the failure.
    match report.failed.into_iter().next() {
        Some((_, e)) => Err(e),
        None => Ok(()),
    }
}
