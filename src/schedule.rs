use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

/// Next `run_hour:00:00` UTC strictly after `now`.
pub fn next_run_after(now: DateTime<Utc>, run_hour: u32) -> DateTime<Utc> {
    let run_time = NaiveTime::from_hms_opt(run_hour.min(23), 0, 0).unwrap_or_default();
    let today = Utc.from_utc_datetime(&now.date_naive().and_time(run_time));
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// How long to sleep before the next run.
pub fn time_till_next_run(now: DateTime<Utc>, run_hour: u32) -> std::time::Duration {
    (next_run_after(now, run_hour) - now)
        .to_std()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_before_run_hour_waits_until_today() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(next_run_after(now, 12), Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap());
        assert_eq!(time_till_next_run(now, 12).as_secs(), 2 * 3600 + 30 * 60);
    }

    #[test]
    fn test_after_run_hour_waits_until_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 15, 0, 0).unwrap();
        assert_eq!(next_run_after(now, 12), Utc.with_ymd_and_hms(2026, 5, 2, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_exactly_at_run_hour_schedules_next_day() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 12, 0, 0).unwrap();
        assert_eq!(next_run_after(now, 12), Utc.with_ymd_and_hms(2027, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_midnight_run_hour() {
        let now = Utc.with_ymd_and_hms(2026, 2, 28, 23, 59, 59).unwrap();
        assert_eq!(time_till_next_run(now, 0).as_secs(), 1);
    }
}
