use std::time::Duration;

use chrono::{DateTime, NaiveTime, TimeZone, Weekday};

/// How long until the wall clock of `time` reaches the next midnight
pub fn until_next_midnight<Tz: TimeZone>(time: &DateTime<Tz>) -> Duration {
    let local = time.naive_local();

    let Some(tomorrow) = local.date().succ_opt() else {
        return Duration::ZERO;
    };

    (tomorrow.and_time(NaiveTime::MIN) - local)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Number of days to walk forward from `from` to land on `to` (0 when equal)
pub fn days_until(from: Weekday, to: Weekday) -> u64 {
    ((to.num_days_from_monday() + 7 - from.num_days_from_monday()) % 7) as u64
}
