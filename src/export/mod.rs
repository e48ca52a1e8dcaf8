//! Day view rendering for the map client (JSON) and spreadsheets (CSV).

mod csv;
mod fs_utils;
mod json;

pub use self::csv::write_day_csv;
pub use self::json::{DayPayload, write_day_json};

use crate::errors::AppResult;
use crate::models::day_summary::DaySummary;
use crate::models::day_view::DayView;
use crate::ui::messages::success;
use clap::ValueEnum;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DayFormat {
    Table,
    Json,
    Csv,
}

/// Write a day view to `path` in the given machine format.
pub fn export_day(
    view: &DayView,
    summary: &DaySummary,
    format: DayFormat,
    path: &Path,
    force: bool,
) -> AppResult<()> {
    fs_utils::ensure_writable(path, force)?;
    let file = BufWriter::new(File::create(path)?);

    match format {
        DayFormat::Json => write_day_json(file, view, summary)?,
        DayFormat::Csv => write_day_csv(file, view)?,
        DayFormat::Table => {
            return Err(crate::errors::AppError::Export(
                "table format cannot be written to a file; use json or csv".into(),
            ));
        }
    }

    success(format!("Day view exported: {}", path.display()));
    Ok(())
}
