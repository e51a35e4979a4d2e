use chrono::{Datelike, Days, NaiveDate};

/// First calendar day still inside a trailing window of `months` ending at `today`.
///
/// The day of month is carried over unchanged and rolls forward when the
/// target month is too short, so 31 May minus three months is 3 March
/// (2 March in a leap year).
pub(crate) fn window_start(today: NaiveDate, months: u32) -> NaiveDate {
    let elapsed = i64::from(today.year()) * 12 + i64::from(today.month0()) - i64::from(months);
    let year = i32::try_from(elapsed.div_euclid(12)).ok();
    let month0 = u32::try_from(elapsed.rem_euclid(12)).ok();

    year.zip(month0)
        .and_then(|(year, month0)| NaiveDate::from_ymd_opt(year, month0 + 1, 1))
        .and_then(|first| first.checked_add_days(Days::new(u64::from(today.day0()))))
        .unwrap_or(NaiveDate::MIN)
}

/// Distance between two days of the month on a repeating cycle, so that day 1
/// and day 30 are two days apart on a 31-day cycle.
pub(crate) fn circular_day_distance(first: u32, second: u32, cycle: u32) -> u32 {
    let diff = first.abs_diff(second);
    diff.min(cycle.saturating_sub(diff))
}

pub(crate) fn within_tolerance(first: u32, second: u32, tolerance: u32, cycle: u32) -> bool {
    circular_day_distance(first, second, cycle) <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn window_start_rolls_back_across_year_boundary() {
        assert_eq!(window_start(date(2025, 2, 10), 3), date(2024, 11, 10));
    }

    #[test]
    fn window_start_rolls_overflowing_day_into_next_month() {
        assert_eq!(window_start(date(2025, 5, 31), 3), date(2025, 3, 3));
        assert_eq!(window_start(date(2024, 5, 31), 3), date(2024, 3, 2));
        assert_eq!(window_start(date(2025, 12, 31), 3), date(2025, 10, 1));
    }

    #[test]
    fn window_start_keeps_valid_days() {
        assert_eq!(window_start(date(2025, 10, 28), 3), date(2025, 7, 28));
        assert_eq!(window_start(date(2025, 5, 28), 3), date(2025, 2, 28));
        assert_eq!(window_start(date(2025, 3, 1), 0), date(2025, 3, 1));
    }

    #[test]
    fn distance_wraps_around_month_boundary() {
        assert_eq!(circular_day_distance(1, 30, 31), 2);
        assert_eq!(circular_day_distance(31, 1, 31), 1);
        assert_eq!(circular_day_distance(5, 15, 31), 10);
        assert_eq!(circular_day_distance(12, 12, 31), 0);
    }

    #[test]
    fn tolerance_is_inclusive() {
        assert!(within_tolerance(25, 27, 2, 31));
        assert!(within_tolerance(25, 23, 2, 31));
        assert!(!within_tolerance(25, 28, 2, 31));
        assert!(within_tolerance(30, 1, 2, 31));
    }
}
