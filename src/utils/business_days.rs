//! Business-day calculation: calendar days minus weekends minus holidays.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashSet;

/// Count the dates in `[start, end]` inclusive that are neither Saturday,
/// Sunday nor a configured holiday. An inverted range counts as zero.
pub fn business_days(start: NaiveDate, end: NaiveDate, holidays: &HashSet<NaiveDate>) -> u32 {
    if end < start {
        return 0;
    }

    let mut count = 0;
    let mut day = start;
    while day <= end {
        let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
        if !weekend && !holidays.contains(&day) {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}
