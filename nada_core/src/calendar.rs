//! Calendar utilities shared by streak and history computations.
//!
//! Everything here works on local calendar dates in the caller's time zone.
//! Day differences compare dates, never multiples of 24 hours, so a daylight
//! saving shift cannot turn "yesterday" into "two days ago".

use crate::Granularity;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

/// Local calendar date of an instant
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Whole calendar days from `older` to `newer` in the given zone
///
/// 23:55 on one day to 00:05 the next is a difference of 1.
pub fn day_difference<Tz: TimeZone>(older: &DateTime<Utc>, newer: &DateTime<Utc>, tz: &Tz) -> i64 {
    local_date(newer, tz)
        .signed_duration_since(local_date(older, tz))
        .num_days()
}

/// First instant of a local calendar day
///
/// Picks the earlier instant when midnight is ambiguous and steps forward
/// hour by hour when a DST jump skips midnight entirely.
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    for hour in 0..4 {
        let candidate = midnight + Duration::hours(hour);
        if let Some(local) = tz.from_local_datetime(&candidate).earliest() {
            return local.with_timezone(&Utc);
        }
    }
    Utc.from_utc_datetime(&midnight)
}

/// Date the week containing `date` starts on
pub fn week_start(date: NaiveDate, first_weekday: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() - first_weekday.num_days_from_monday()) % 7;
    date - Duration::days(i64::from(offset))
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Calendar date that keys the bucket an instant falls into
pub fn bucket_date<Tz: TimeZone>(
    instant: &DateTime<Utc>,
    granularity: Granularity,
    first_weekday: Weekday,
    tz: &Tz,
) -> NaiveDate {
    let date = local_date(instant, tz);
    match granularity {
        Granularity::Weekly => week_start(date, first_weekday),
        Granularity::Monthly => month_start(date),
    }
}

/// Next local midnight strictly after `now`
pub fn next_day_boundary<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    match now.date_naive().succ_opt() {
        Some(tomorrow) => start_of_day(tomorrow, &tz),
        None => now.with_timezone(&Utc) + Duration::days(1),
    }
}

/// Render a duration as `HHh MMm SSs`; negative durations render as zero
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!(
        "{:02}h {:02}m {:02}s",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use chrono_tz::America::Sao_Paulo;
    use chrono_tz::Europe::Berlin;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_difference_across_midnight() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 5, 1, 23, 55, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2026, 5, 2, 0, 5, 0).unwrap();
        assert_eq!(day_difference(&late, &early, &tz), 1);
    }

    #[test]
    fn test_day_difference_uses_local_zone() {
        // 23:00 and 03:00 UTC are the same day in UTC-5
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let a = Utc.with_ymd_and_hms(2026, 5, 1, 23, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 5, 2, 3, 0, 0).unwrap();
        assert_eq!(day_difference(&a, &b, &tz), 0);
        assert_eq!(day_difference(&a, &b, &Utc), 1);
    }

    #[test]
    fn test_week_start_monday() {
        // 2026-10-15 is a Thursday
        assert_eq!(week_start(date(2026, 10, 15), Weekday::Mon), date(2026, 10, 12));
        assert_eq!(week_start(date(2026, 10, 12), Weekday::Mon), date(2026, 10, 12));
    }

    #[test]
    fn test_week_start_sunday() {
        assert_eq!(week_start(date(2026, 10, 15), Weekday::Sun), date(2026, 10, 11));
        assert_eq!(week_start(date(2026, 10, 17), Weekday::Sun), date(2026, 10, 11));
        assert_eq!(week_start(date(2026, 10, 18), Weekday::Sun), date(2026, 10, 18));
    }

    #[test]
    fn test_week_start_crosses_year() {
        // 2027-01-01 is a Friday
        assert_eq!(week_start(date(2027, 1, 1), Weekday::Mon), date(2026, 12, 28));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2026, 2, 28)), date(2026, 2, 1));
    }

    #[test]
    fn test_start_of_day_in_offset_zone() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let start = start_of_day(date(2026, 4, 1), &tz);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 31, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_next_day_boundary() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 6, 10, 21, 30, 0).unwrap();
        let boundary = next_day_boundary(&now);
        assert_eq!(boundary, Utc.with_ymd_and_hms(2026, 6, 10, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_day_difference_across_spring_forward() {
        // Berlin skips 02:00-03:00 on 2026-03-29; these marks are 22h45m apart
        let before = Berlin.with_ymd_and_hms(2026, 3, 28, 23, 30, 0).unwrap().with_timezone(&Utc);
        let after = Berlin.with_ymd_and_hms(2026, 3, 29, 23, 15, 0).unwrap().with_timezone(&Utc);
        assert_eq!(after - before, Duration::minutes(22 * 60 + 45));
        assert_eq!(day_difference(&before, &after, &Berlin), 1);
    }

    #[test]
    fn test_start_of_day_with_skipped_midnight() {
        // Sao Paulo jumped from 00:00 -03 straight to 01:00 -02 on 2018-11-04
        let start = start_of_day(date(2018, 11, 4), &Sao_Paulo);
        assert_eq!(start, Utc.with_ymd_and_hms(2018, 11, 4, 3, 0, 0).unwrap());
        assert_eq!(start.with_timezone(&Sao_Paulo).time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_day_on_fall_back() {
        // The repeated hour is 02:00-03:00, midnight itself is unambiguous
        let start = start_of_day(date(2026, 10, 25), &Berlin);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 24, 22, 0, 0).unwrap());
        assert_eq!(
            start_of_day(date(2026, 10, 26), &Berlin) - start,
            Duration::hours(25)
        );
    }

    #[test]
    fn test_next_day_boundary_with_skipped_midnight() {
        let now = Sao_Paulo.with_ymd_and_hms(2018, 11, 3, 22, 0, 0).unwrap();
        let boundary = next_day_boundary(&now);
        assert_eq!(boundary, Utc.with_ymd_and_hms(2018, 11, 4, 3, 0, 0).unwrap());
        assert_eq!(boundary - now.with_timezone(&Utc), Duration::hours(2));
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::seconds(3 * 3600 + 4 * 60 + 5)), "03h 04m 05s");
        assert_eq!(format_countdown(Duration::seconds(-10)), "00h 00m 00s");
    }
}
