//! Calendar-day arithmetic shared by the metrics and timeline layers

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};

const MS_PER_DAY: i64 = 86_400_000;

/// Whole days from `from` to `to`, floored (negative when `to` is earlier)
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(MS_PER_DAY)
}

/// Midnight UTC at the start of `date`
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// First day of the month `offset` months away from `date`'s month
pub fn month_start(date: NaiveDate, offset: i32) -> Option<NaiveDate> {
    let first = date.with_day(1)?;
    let months = Months::new(offset.unsigned_abs());
    if offset >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    }
}

/// Last day of the month `offset` months away from `date`'s month
pub fn month_end(date: NaiveDate, offset: i32) -> Option<NaiveDate> {
    month_start(date, offset.checked_add(1)?)?.pred_opt()
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> Option<i64> {
    let start = month_start(date, 0)?;
    let next = month_start(date, 1)?;
    Some((next - start).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_between_floors_partial_days() {
        let a = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 3, 3, 23, 59, 0).unwrap();
        assert_eq!(days_between(a, b), 2);

        // Floor, not truncation, for negative spans
        assert_eq!(days_between(b, a), -3);
        assert_eq!(days_between(a, a), 0);
    }

    #[test]
    fn test_month_start_crosses_years() {
        assert_eq!(month_start(ymd(2026, 1, 20), -2), Some(ymd(2025, 11, 1)));
        assert_eq!(month_start(ymd(2026, 11, 5), 3), Some(ymd(2027, 2, 1)));
    }

    #[test]
    fn test_month_end_handles_leap_years() {
        assert_eq!(month_end(ymd(2028, 2, 10), 0), Some(ymd(2028, 2, 29)));
        assert_eq!(month_end(ymd(2026, 1, 31), 1), Some(ymd(2026, 2, 28)));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(ymd(2026, 4, 15)), Some(30));
        assert_eq!(days_in_month(ymd(2026, 12, 1)), Some(31));
    }

    #[test]
    fn test_midnight() {
        let m = midnight(ymd(2026, 3, 15));
        assert_eq!(m, Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
    }
}
