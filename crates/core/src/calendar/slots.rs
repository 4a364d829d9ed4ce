//! Free-slot selection
//!
//! Pure functions over a target date, a timezone and the busy intervals of
//! that day. Candidates are built as local wall-clock times and converted to
//! UTC with the offset in force on the target date before being compared
//! against busy intervals.

use brief_domain::{BusyInterval, ReminderSlot, SlotPolicy};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::time::{local_datetime_to_utc, utc_to_local};

/// Pick a reminder slot of `slot_minutes` on `date`, or `None` when the
/// policy finds no room.
pub fn select_slot(
    policy: SlotPolicy,
    date: NaiveDate,
    tz: Tz,
    slot_minutes: u32,
    busy: &[BusyInterval],
) -> Option<ReminderSlot> {
    let length = Duration::minutes(i64::from(slot_minutes.max(1)));

    match policy {
        SlotPolicy::AfterLastMeeting { default_hour, buffer_minutes } => {
            after_last_meeting(date, tz, length, default_hour, buffer_minutes, busy)
        }
        SlotPolicy::FirstFreeInWindow { start_hour, end_hour } => {
            first_free_in_window(date, tz, length, start_hour, end_hour, busy)
        }
    }
}

fn after_last_meeting(
    date: NaiveDate,
    tz: Tz,
    length: Duration,
    default_hour: u32,
    buffer_minutes: u32,
    busy: &[BusyInterval],
) -> Option<ReminderSlot> {
    let start = match busy.iter().map(|interval| interval.end).max() {
        None => date.and_time(NaiveTime::from_hms_opt(default_hour, 0, 0)?),
        Some(last_end) => {
            let buffered = last_end + Duration::minutes(i64::from(buffer_minutes));
            ceil_to_minute(utc_to_local(buffered, tz))
        }
    };

    let end = start + length;
    // Meetings running to midnight leave no room on the target day.
    if start.date() != date || end > next_midnight(date) {
        return None;
    }

    Some(ReminderSlot { start, end })
}

fn first_free_in_window(
    date: NaiveDate,
    tz: Tz,
    length: Duration,
    start_hour: u32,
    end_hour: u32,
    busy: &[BusyInterval],
) -> Option<ReminderSlot> {
    let window_start = date.and_time(NaiveTime::from_hms_opt(start_hour, 0, 0)?);
    let window_end = if end_hour >= 24 {
        next_midnight(date)
    } else {
        date.and_time(NaiveTime::from_hms_opt(end_hour, 0, 0)?)
    };

    let mut candidate = window_start;
    while candidate + length <= window_end {
        let end = candidate + length;
        let (utc_start, utc_end) = utc_bounds(candidate, end, tz);
        if !busy.iter().any(|interval| interval.overlaps(utc_start, utc_end)) {
            return Some(ReminderSlot { start: candidate, end });
        }
        candidate = end;
    }

    None
}

fn utc_bounds(start: NaiveDateTime, end: NaiveDateTime, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    (local_datetime_to_utc(start, tz), local_datetime_to_utc(end, tz))
}

fn next_midnight(date: NaiveDate) -> NaiveDateTime {
    (date + Duration::days(1)).and_time(NaiveTime::MIN)
}

fn ceil_to_minute(local: NaiveDateTime) -> NaiveDateTime {
    let truncated = local.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(local);
    if truncated == local {
        local
    } else {
        truncated + Duration::minutes(1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Europe::London;

    use super::*;

    const FRIDAY: (i32, u32, u32) = (2026, 2, 13);

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(FRIDAY.0, FRIDAY.1, FRIDAY.2).unwrap()
    }

    fn local(h: u32, m: u32) -> NaiveDateTime {
        friday().and_hms_opt(h, m, 0).unwrap()
    }

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(FRIDAY.0, FRIDAY.1, FRIDAY.2, h, m, 0).unwrap()
    }

    fn busy(from: (u32, u32), to: (u32, u32)) -> BusyInterval {
        BusyInterval::new(utc(from.0, from.1), utc(to.0, to.1))
    }

    #[test]
    fn window_scan_takes_first_slot_on_empty_day() {
        let slot = select_slot(SlotPolicy::morning_window(), friday(), London, 15, &[]).unwrap();
        assert_eq!(slot.start, local(9, 0));
        assert_eq!(slot.end, local(9, 15));
    }

    #[test]
    fn window_scan_skips_busy_prefix() {
        let slot = select_slot(
            SlotPolicy::morning_window(),
            friday(),
            London,
            15,
            &[busy((9, 0), (9, 30))],
        )
        .unwrap();
        assert_eq!(slot.start, local(9, 30));
    }

    #[test]
    fn window_scan_touching_boundary_is_free() {
        let slot = select_slot(
            SlotPolicy::morning_window(),
            friday(),
            London,
            15,
            &[busy((9, 0), (9, 15)), busy((9, 30), (12, 0))],
        )
        .unwrap();
        assert_eq!(slot.start, local(9, 15));
    }

    #[test]
    fn window_scan_reports_fully_booked_morning() {
        let slot = select_slot(
            SlotPolicy::morning_window(),
            friday(),
            London,
            15,
            &[busy((8, 0), (12, 0))],
        );
        assert!(slot.is_none());
    }

    #[test]
    fn window_scan_uses_summer_offset() {
        // 08:00-08:15 UTC is 09:00-09:15 BST.
        let summer = NaiveDate::from_ymd_opt(2026, 7, 10).unwrap();
        let booked = BusyInterval::new(
            Utc.with_ymd_and_hms(2026, 7, 10, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 7, 10, 8, 15, 0).unwrap(),
        );
        let slot =
            select_slot(SlotPolicy::morning_window(), summer, London, 15, &[booked]).unwrap();
        assert_eq!(slot.start, summer.and_hms_opt(9, 15, 0).unwrap());
    }

    #[test]
    fn after_last_meeting_defaults_to_noon() {
        let slot = select_slot(SlotPolicy::default(), friday(), London, 15, &[]).unwrap();
        assert_eq!(slot.start, local(12, 0));
        assert_eq!(slot.end, local(12, 15));
    }

    #[test]
    fn after_last_meeting_adds_buffer_to_latest_end() {
        let slot = select_slot(
            SlotPolicy::default(),
            friday(),
            London,
            15,
            &[busy((15, 0), (16, 0)), busy((10, 0), (11, 0))],
        )
        .unwrap();
        assert_eq!(slot.start, local(16, 15));
    }

    #[test]
    fn after_last_meeting_rounds_up_partial_minutes() {
        let ragged = BusyInterval::new(
            utc(13, 0),
            Utc.with_ymd_and_hms(2026, 2, 13, 13, 44, 30).unwrap(),
        );
        let slot = select_slot(SlotPolicy::default(), friday(), London, 15, &[ragged]).unwrap();
        assert_eq!(slot.start, local(14, 0));
    }

    #[test]
    fn after_last_meeting_gives_up_near_midnight() {
        let slot = select_slot(
            SlotPolicy::default(),
            friday(),
            London,
            15,
            &[busy((22, 0), (23, 40))],
        );
        assert!(slot.is_none());
    }
}
