//! Working-day policy — weekends and a fixed holiday table.

use chrono::{Datelike, NaiveDate, Weekday};

/// Enumerated holiday table (year-specific, India 2024). Exact date match
/// only — nothing is derived from a holiday-calculation rule.
const HOLIDAYS: &[&str] = &[
    "2024-01-01", // New Year
    "2024-01-26", // Republic Day
    "2024-03-25", // Holi
    "2024-04-14", // Bengali New Year
    "2024-08-15", // Independence Day
    "2024-10-02", // Gandhi Jayanti
];

/// Whether `date` is in the holiday table. Date-only comparison — callers
/// pass a `NaiveDate`, so time-of-day is already truncated away.
pub fn is_holiday(date: NaiveDate) -> bool {
    let date_str = date.format("%Y-%m-%d").to_string();
    HOLIDAYS.iter().any(|h| *h == date_str)
}

/// A working day is neither a weekend day nor a listed holiday.
pub fn is_working_day(date: NaiveDate) -> bool {
    let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
    !weekend && !is_holiday(date)
}
