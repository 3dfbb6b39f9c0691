use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

/// Appointments occupy half-open half-hour slots: [slot, slot + 30min).
pub const SLOT_MINUTES: i64 = 30;

/// Clinic opening hours as wall time; the last bookable slot starts at close.
pub fn clinic_hours() -> (NaiveTime, NaiveTime) {
    (
        NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
        NaiveTime::from_hms_opt(19, 30, 0).unwrap_or(NaiveTime::MIN),
    )
}

/// Floors a timestamp to the start of its half-hour slot, dropping seconds
/// and sub-seconds. 10:00 and 10:15 land in the same slot; 10:30 starts the
/// next one.
pub fn floor_to_half_hour(t: NaiveDateTime) -> NaiveDateTime {
    let minute = if t.minute() < 30 { 0 } else { 30 };
    t.with_nanosecond(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_minute(minute))
        .unwrap_or(t)
}

/// Rounds up to the next slot boundary. Timestamps already on a boundary are
/// kept (seconds stripped), anything past one moves to the next boundary.
pub fn ceil_to_half_hour(t: NaiveDateTime) -> NaiveDateTime {
    let base = match t.with_nanosecond(0).and_then(|t| t.with_second(0)) {
        Some(base) => base,
        None => return t,
    };
    if t.minute() == 0 || t.minute() == 30 {
        if t.second() == 0 && t.nanosecond() == 0 {
            return base;
        }
    }
    if t.minute() < 30 {
        base.with_minute(30).unwrap_or(base)
    } else {
        base.with_minute(0).unwrap_or(base) + Duration::hours(1)
    }
}

/// The half-open UTC-agnostic bounds of the slot containing `t`.
pub fn slot_bounds(t: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let start = floor_to_half_hour(t);
    (start, start + Duration::minutes(SLOT_MINUTES))
}

/// "%H:%M" labels for every slot boundary from `start` to `end` inclusive.
pub fn build_half_hour_slots(start: NaiveTime, end: NaiveTime) -> Vec<String> {
    let mut slots = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        slots.push(cursor.format("%H:%M").to_string());
        let (next, wrapped) = cursor.overflowing_add_signed(Duration::minutes(SLOT_MINUTES));
        if wrapped != 0 {
            break;
        }
        cursor = next;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn floor_collapses_within_slot_timestamps() {
        assert_eq!(floor_to_half_hour(at(10, 0, 0)), at(10, 0, 0));
        assert_eq!(floor_to_half_hour(at(10, 15, 42)), at(10, 0, 0));
        assert_eq!(floor_to_half_hour(at(10, 29, 59)), at(10, 0, 0));
        assert_eq!(floor_to_half_hour(at(10, 30, 0)), at(10, 30, 0));
        assert_eq!(floor_to_half_hour(at(10, 45, 1)), at(10, 30, 0));
    }

    #[test]
    fn ceil_keeps_boundaries_and_advances_everything_else() {
        assert_eq!(ceil_to_half_hour(at(10, 0, 0)), at(10, 0, 0));
        assert_eq!(ceil_to_half_hour(at(10, 30, 0)), at(10, 30, 0));
        assert_eq!(ceil_to_half_hour(at(10, 0, 1)), at(10, 30, 0));
        assert_eq!(ceil_to_half_hour(at(10, 29, 0)), at(10, 30, 0));
        assert_eq!(ceil_to_half_hour(at(10, 31, 0)), at(11, 0, 0));
        assert_eq!(ceil_to_half_hour(at(23, 45, 0)), at(23, 0, 0) + Duration::hours(1));
    }

    #[test]
    fn slot_bounds_are_half_open() {
        let (start, end) = slot_bounds(at(10, 15, 0));
        assert_eq!(start, at(10, 0, 0));
        assert_eq!(end, at(10, 30, 0));
    }

    #[test]
    fn full_day_slot_grid() {
        let (open, close) = clinic_hours();
        let slots = build_half_hour_slots(open, close);
        assert_eq!(slots.len(), 24);
        assert_eq!(slots.first().map(String::as_str), Some("08:00"));
        assert_eq!(slots.last().map(String::as_str), Some("19:30"));
        assert!(slots.contains(&"13:30".to_string()));
    }

    #[test]
    fn slot_grid_stops_at_midnight() {
        let start = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
        assert_eq!(build_half_hour_slots(start, end), vec!["23:00", "23:30"]);
    }
}
