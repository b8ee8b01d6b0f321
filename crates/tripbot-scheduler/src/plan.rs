//! Validation for the "schedule for tomorrow at midnight" operation.

use chrono::{DateTime, Days, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use tripbot_core::error::{Result, TripBotError};

use crate::calendar::is_working_day;

/// Compute tomorrow's midnight from `now`, rejecting the two disallowed
/// cases before any state is mutated:
/// - calls made at exactly 00:00 (the poller could race the fresh schedule)
/// - tomorrows that are not working days
pub fn plan_for_tomorrow(now: DateTime<Tz>) -> Result<DateTime<Tz>> {
    if now.hour() == 0 && now.minute() == 0 {
        return Err(TripBotError::Validation(
            "Cannot schedule at exactly midnight. Please try again in a minute.".into(),
        ));
    }

    let tomorrow = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .ok_or_else(|| TripBotError::Validation("Date out of range".into()))?;

    if !is_working_day(tomorrow) {
        return Err(TripBotError::Validation(
            "Tomorrow is not a working day. No message will be scheduled.".into(),
        ));
    }

    now.timezone()
        .from_local_datetime(&tomorrow.and_time(NaiveTime::MIN))
        .single()
        .ok_or_else(|| TripBotError::Validation("Ambiguous local midnight".into()))
}
