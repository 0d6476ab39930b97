// Date utility functions

use chrono::{Datelike, Duration, NaiveDate};

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

/// Every date of the month in order.
pub fn days_of_month(year: i32, month: u32) -> Vec<NaiveDate> {
    (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Move by whole months, keeping the day where the target month allows it.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date - Duration::days(1)
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date + Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 4), 30);
    }

    #[test]
    fn test_shift_months_clamps_day() {
        assert_eq!(shift_months(ymd(2025, 1, 31), 1), ymd(2025, 2, 28));
        assert_eq!(shift_months(ymd(2025, 1, 15), -1), ymd(2024, 12, 15));
        assert_eq!(shift_months(ymd(2024, 12, 1), 13), ymd(2026, 1, 1));
    }

    #[test]
    fn test_day_steps_cross_month() {
        assert_eq!(next_day(ymd(2025, 2, 28)), ymd(2025, 3, 1));
        assert_eq!(previous_day(ymd(2025, 3, 1)), ymd(2025, 2, 28));
    }

    #[test]
    fn test_first_of_month() {
        assert_eq!(first_of_month(ymd(2025, 7, 19)), ymd(2025, 7, 1));
    }
}
