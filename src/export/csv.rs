use crate::errors::AppResult;
use crate::models::day_view::DayView;
use crate::utils::time::to_db_ts;
use chrono::{DateTime, Utc};
use csv::Writer;
use std::io::Write;

/// One row per sample and per checkpoint, merged in time order.
/// Samples come first when both share a timestamp.
pub fn write_day_csv<W: Write>(out: W, view: &DayView) -> AppResult<()> {
    let mut wtr = Writer::from_writer(out);

    wtr.write_record(["recorded_at", "type", "lat", "lng", "shop", "note", "photo"])?;

    let mut rows: Vec<(DateTime<Utc>, u8, [String; 7])> =
        Vec::with_capacity(view.samples.len() + view.checkpoints.len());

    for s in &view.samples {
        rows.push((
            s.recorded_at,
            0,
            [
                to_db_ts(&s.recorded_at),
                "PING".to_string(),
                format!("{:.6}", s.position.lat),
                format!("{:.6}", s.position.lng),
                String::new(),
                String::new(),
                String::new(),
            ],
        ));
    }

    for c in &view.checkpoints {
        rows.push((
            c.recorded_at,
            1,
            [
                to_db_ts(&c.recorded_at),
                c.kind().to_db_str().to_string(),
                format!("{:.6}", c.position.lat),
                format!("{:.6}", c.position.lng),
                c.shop_name().unwrap_or_default().to_string(),
                c.note.clone().unwrap_or_default(),
                c.photo_url().unwrap_or_default().to_string(),
            ],
        ));
    }

    // Stable sort keeps each source's own id order on ties.
    rows.sort_by_key(|(ts, rank, _)| (*ts, *rank));

    for (_, _, record) in &rows {
        wtr.write_record(record)?;
    }

    wtr.flush()?;
    Ok(())
}
