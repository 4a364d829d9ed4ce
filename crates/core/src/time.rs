//! Wall-clock utilities
//!
//! All reminder arithmetic happens in a fixed target timezone, independent of
//! the server's local zone. The UTC offset is resolved for each calendar date
//! individually because it changes with daylight saving.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;

use brief_domain::{TargetDayPolicy, TimeWindow};

/// Next occurrence of `weekday` on or after `from`.
///
/// With `include_today == false` an occurrence falling on `from` itself is
/// skipped and the one a week later is returned.
pub fn next_weekday(from: NaiveDate, weekday: Weekday, include_today: bool) -> NaiveDate {
    let current = i64::from(from.weekday().num_days_from_monday());
    let target = i64::from(weekday.num_days_from_monday());
    let mut delta = (target - current).rem_euclid(7);
    if delta == 0 && !include_today {
        delta = 7;
    }
    from + Duration::days(delta)
}

/// Upcoming Friday; `from` itself when it is a Friday.
pub fn get_next_friday(from: NaiveDate) -> NaiveDate {
    next_weekday(from, Weekday::Fri, true)
}

/// Upcoming Monday; `from` itself when it is a Monday.
pub fn get_next_monday(from: NaiveDate) -> NaiveDate {
    next_weekday(from, Weekday::Mon, true)
}

/// Resolve a target-day policy against a local calendar date.
pub fn target_day(policy: TargetDayPolicy, today: NaiveDate) -> NaiveDate {
    next_weekday(today, policy.weekday, policy.include_today)
}

/// Calendar date of `now` as observed in `tz`.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Wall-clock reading of `instant` in `tz`.
pub fn utc_to_local(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

/// Convert a local wall-clock reading in `tz` to a UTC instant.
///
/// Ambiguous readings (clocks going back) resolve to the earlier instant.
/// Readings inside a spring-forward gap are interpreted with the offset in
/// force before the gap, which lands them the gap's length later.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Utc> {
    local_datetime_to_utc(date.and_time(time), tz)
}

/// [`local_to_utc`] for an already combined reading.
pub fn local_datetime_to_utc(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    if let Some(resolved) = tz.from_local_datetime(&local).earliest() {
        return resolved.with_timezone(&Utc);
    }

    let before_gap = tz.offset_from_utc_datetime(&(local - Duration::days(1))).fix();
    let utc = local - Duration::seconds(i64::from(before_gap.local_minus_utc()));
    Utc.from_utc_datetime(&utc)
}

/// The full local day `[00:00, next 00:00)` as a UTC window. Spans 23 or 25
/// hours on transition days.
pub fn day_window(date: NaiveDate, tz: Tz) -> TimeWindow {
    let next = date + Duration::days(1);
    TimeWindow {
        start: local_to_utc(date, NaiveTime::MIN, tz),
        end: local_to_utc(next, NaiveTime::MIN, tz),
    }
}

/// Offset-free local datetime, the form the provider expects next to an
/// explicit `timeZone` field.
pub fn format_local(local: NaiveDateTime) -> String {
    local.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// RFC 3339 UTC instant with second precision and a `Z` suffix.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Monday of the week containing `date`. Sunday belongs to the week that
/// started six days earlier.
pub fn week_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
