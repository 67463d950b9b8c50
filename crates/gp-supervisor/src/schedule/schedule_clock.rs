//! Daily restart deadline arithmetic.
//!
//! Everything here is a pure function of its inputs; the supervisor
//! recomputes the deadline from "now" instead of accumulating intervals.

use std::time::Duration;

use chrono::{DateTime, Days, LocalResult, NaiveDate, TimeDelta, TimeZone};

/// Next instant strictly after `now` at `hour`:00:00 local time.
///
/// Returns today's occurrence when it is still ahead, otherwise tomorrow's.
/// Hours above 23 are clamped to 23.
pub fn next_deadline<Tz: TimeZone>(now: &DateTime<Tz>, hour: u8) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    if let Some(candidate) = at_hour(&tz, today, hour)
        && candidate > *now
    {
        return candidate;
    }

    today
        .checked_add_days(Days::new(1))
        .and_then(|tomorrow| at_hour(&tz, tomorrow, hour))
        .unwrap_or_else(|| now.clone() + TimeDelta::days(1))
}

/// Time left until `deadline`, zero once it has passed.
pub fn remaining<Tz: TimeZone>(now: &DateTime<Tz>, deadline: &DateTime<Tz>) -> Duration {
    deadline
        .clone()
        .signed_duration_since(now.clone())
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// `H:MM:SS`, hours unpadded.
pub fn format_remaining(duration: Duration) -> String {
    let total = duration.as_secs();
    format!(
        "{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

fn at_hour<Tz: TimeZone>(tz: &Tz, date: NaiveDate, hour: u8) -> Option<DateTime<Tz>> {
    let naive = date.and_hms_opt(u32::from(hour.min(23)), 0, 0)?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => Some(t),
        // DST fold: the first occurrence
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        // DST gap: the hour does not exist, use the first valid instant after it
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest(),
    }
}
