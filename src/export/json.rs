use crate::errors::AppResult;
use crate::models::day_summary::DaySummary;
use crate::models::day_view::DayView;
use serde::Serialize;
use std::io::Write;

/// What the map client receives: the raw view plus the derived summary.
#[derive(Debug, Serialize)]
pub struct DayPayload<'a> {
    #[serde(flatten)]
    pub view: &'a DayView,
    pub summary: &'a DaySummary,
}

pub fn write_day_json<W: Write>(mut out: W, view: &DayView, summary: &DaySummary) -> AppResult<()> {
    let payload = DayPayload { view, summary };
    serde_json::to_writer_pretty(&mut out, &payload)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
