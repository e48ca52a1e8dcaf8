use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local, LocalResult, NaiveDate, TimeZone, Utc};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// The UTC instant at which `date` begins in the local timezone.
pub fn start_of_day(date: NaiveDate) -> AppResult<DateTime<Utc>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;

    // DST gaps can swallow midnight; the first valid instant of the day wins.
    let local = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => Local
            .from_local_datetime(&(midnight + chrono::Duration::hours(1)))
            .earliest()
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?,
    };
    Ok(local.with_timezone(&Utc))
}

/// Half-open `[start, end)` window covering `date` in local time.
pub fn day_bounds(date: NaiveDate) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date
        .succ_opt()
        .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
    Ok((start_of_day(date)?, start_of_day(next)?))
}

/// Local calendar date of a stored instant.
pub fn local_date(ts: &DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}
