use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeZone, Utc};
use chrono_tz::Europe::Kyiv;
use chrono_tz::Tz;

pub const SECONDS_PER_DAY: u64 = 86_400;

const MONTHS_UA: [&str; 12] = [
    "січня",
    "лютого",
    "березня",
    "квітня",
    "травня",
    "червня",
    "липня",
    "серпня",
    "вересня",
    "жовтня",
    "листопада",
    "грудня",
];

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Current wall clock in the clan's timezone.
pub fn kyiv_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&Kyiv)
}

/// Convert a unix timestamp to Kyiv local time.
pub fn kyiv_datetime(unix_secs: u64) -> DateTime<Tz> {
    let secs = i64::try_from(unix_secs).unwrap_or(i64::MAX);
    DateTime::<Utc>::from_timestamp(secs, 0)
        .unwrap_or_default()
        .with_timezone(&Kyiv)
}

/// Format a timestamp as a Ukrainian long date, e.g. `30 жовтня 2026 року`.
pub fn format_ua_date(unix_secs: u64) -> String {
    let date = kyiv_datetime(unix_secs);
    let month = MONTHS_UA
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{} {} {} року", date.day(), month, date.year())
}

/// ISO calendar day (`YYYY-MM-DD`) of the given Kyiv moment.
pub fn iso_day(now: &DateTime<Tz>) -> String {
    now.date_naive().to_string()
}

/// Seconds from `now` until the next occurrence of `hour:minute` local time.
///
/// A target equal to `now` counts as already passed, so the result is always
/// a full cycle ahead in that case. DST transitions are respected.
pub fn seconds_until_next_local(now: &DateTime<Tz>, hour: u32, minute: u32) -> u64 {
    let Some(at) = NaiveTime::from_hms_opt(hour, minute, 0) else {
        return SECONDS_PER_DAY;
    };

    let today = now.date_naive();
    let mut target_day = today;
    loop {
        let candidate = now
            .timezone()
            .from_local_datetime(&target_day.and_time(at))
            .earliest();

        if let Some(candidate) = candidate
            && candidate > *now
        {
            let delta = candidate.signed_duration_since(*now).num_seconds();
            return u64::try_from(delta).unwrap_or(0);
        }

        match target_day.checked_add_days(Days::new(1)) {
            Some(next) if next <= today + Days::new(2) => target_day = next,
            _ => return SECONDS_PER_DAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Europe::Kyiv;

    use super::{format_ua_date, iso_day, seconds_until_next_local};

    #[test]
    fn formats_ukrainian_dates_in_kyiv_time() {
        // 2026-10-29 22:30 UTC is already the 30th in Kyiv.
        assert_eq!(format_ua_date(1_793_313_000), "30 жовтня 2026 року");
        assert_eq!(format_ua_date(1_767_268_800), "1 січня 2026 року");
    }

    #[test]
    fn iso_day_uses_local_calendar() {
        let late = Kyiv.with_ymd_and_hms(2026, 10, 18, 23, 59, 0).unwrap();
        assert_eq!(iso_day(&late), "2026-10-18");
    }

    #[test]
    fn next_local_time_later_today() {
        let now = Kyiv.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
        assert_eq!(seconds_until_next_local(&now, 9, 0), 3_600);
    }

    #[test]
    fn next_local_time_rolls_to_tomorrow() {
        let now = Kyiv.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        assert_eq!(seconds_until_next_local(&now, 9, 0), 86_400);

        let after = Kyiv.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        assert_eq!(seconds_until_next_local(&after, 9, 0), 84_600);
    }

    #[test]
    fn next_local_time_respects_dst_end() {
        // Clocks go back one hour in the night of 25 October 2026.
        let now = Kyiv.with_ymd_and_hms(2026, 10, 24, 10, 0, 0).unwrap();
        assert_eq!(seconds_until_next_local(&now, 9, 0), 24 * 3_600);
    }
}
