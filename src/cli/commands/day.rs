use crate::cli::commands::{acting_agent, open_pool};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::day::DayLogic;
use crate::errors::{AppError, AppResult};
use crate::export::{DayFormat, export_day, write_day_csv, write_day_json};
use crate::models::day_summary::DaySummary;
use crate::models::day_view::DayView;
use crate::ui::messages::{header, info};
use crate::utils::colors::{color_for_kind, paint};
use crate::utils::date;
use crate::utils::formatting::{format_coord, format_distance, local_time, mins2readable};
use crate::utils::table::{Column, Table};
use std::io;
use std::path::Path;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Day {
        agent,
        date: date_arg,
        format,
        out,
        force,
    } = &cli.command
    else {
        return Ok(());
    };

    let day = match date_arg {
        Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
        None => date::today(),
    };

    let pool = open_pool(cfg)?;
    let acting = acting_agent(cli, &pool)?;
    let agent_id = match agent {
        Some(id) if *id != acting.id => {
            return Err(AppError::Unauthorized(format!(
                "agent {} may not read the day of agent {}",
                acting.id, id
            )));
        }
        _ => acting.id,
    };

    let view = DayLogic::view(&pool, agent_id, day)?;
    let summary = DayLogic::summarize(&view);

    match (format, out) {
        (DayFormat::Table, None) => print_day(&view, &summary),
        (DayFormat::Table, Some(_)) => {
            return Err(AppError::Export(
                "--out requires --format json or csv".into(),
            ));
        }
        (fmt, Some(path)) => export_day(&view, &summary, *fmt, Path::new(path), *force)?,
        (DayFormat::Json, None) => write_day_json(io::stdout().lock(), &view, &summary)?,
        (DayFormat::Csv, None) => write_day_csv(io::stdout().lock(), &view)?,
    }

    Ok(())
}

fn print_day(view: &DayView, summary: &DaySummary) {
    header(format!("Agent #{} on {}", view.agent_id, view.date));

    if view.is_empty() {
        info(format!("No activity on {}.", view.date));
        return;
    }

    println!(
        "Pings: {} | Distance: {} | Shop visits: {} | On duty: {}",
        summary.sample_count,
        format_distance(summary.distance_m),
        summary.shop_visits,
        mins2readable(summary.on_duty_minutes)
    );

    if !view.checkpoints.is_empty() {
        println!("\nCHECKPOINTS:");
        let mut table = Table::new(vec![
            Column::new("TIME", 8),
            Column::new("KIND", 10),
            Column::new("POSITION", 8),
            Column::new("SHOP", 4),
            Column::new("NOTE", 4),
        ]);
        for c in &view.checkpoints {
            table.add_row(vec![
                local_time(&c.recorded_at),
                paint(color_for_kind(c.kind()), c.kind().to_db_str()),
                format_coord(&c.position),
                c.shop_name().unwrap_or("").to_string(),
                c.note.clone().unwrap_or_default(),
            ]);
        }
        print!("{}", table.render());
    }

    if !summary.sessions.is_empty() {
        println!("\nSESSIONS:");
        for (i, s) in summary.sessions.iter().enumerate() {
            let start = s.started_at.as_ref().map(local_time).unwrap_or_else(|| "--:--:--".into());
            let end = s.ended_at.as_ref().map(local_time).unwrap_or_else(|| "open".into());
            let flag = if s.auto_closed { " (auto-ended)" } else { "" };
            println!(
                "{:>2}. {} → {}  {}{}",
                i + 1,
                start,
                end,
                mins2readable(s.duration_minutes),
                flag
            );
        }
    }

    if !view.samples.is_empty() {
        println!("\nTRAIL:");
        for s in &view.samples {
            println!("- {} | {}", local_time(&s.recorded_at), format_coord(&s.position));
        }
    }
}
