use time::{Duration, OffsetDateTime};

use db::DueCronEntry;

/// Whether a crontab entry is due to run at `now`.
///
/// Interval is `minutes + hours*60 + days*1440` minutes; an all-zero
/// interval defaults to one minute rather than running every tick. A
/// `startdt` in the future always means "not due yet", regardless of
/// `lastdt`. A `None` `lastdt` (never run) is always due once `startdt`
/// has passed.
pub fn is_due(entry: &DueCronEntry, now: OffsetDateTime) -> bool {
    if let Some(start) = entry.startdt {
        if start > now {
            return false;
        }
    }

    let raw_minutes = entry.minutes + entry.hours * 60 + entry.days * 1440;
    let interval_minutes = if raw_minutes <= 0 { 1 } else { raw_minutes };

    match entry.lastdt {
        None => true,
        Some(last) => now - last >= Duration::minutes(interval_minutes as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(minutes: i32, hours: i32, days: i32, startdt: Option<OffsetDateTime>, lastdt: Option<OffsetDateTime>) -> DueCronEntry {
        DueCronEntry {
            cron_id: 1,
            task_id: 1,
            task_name: "t".to_string(),
            node_group_id: 1,
            request_group_id: 1,
            handler_id: 1,
            minutes,
            hours,
            days,
            startdt,
            lastdt,
            status: "ACTIVE".to_string(),
            agent: None,
        }
    }

    #[test]
    fn never_run_with_past_start_is_due() {
        let now = OffsetDateTime::now_utc();
        let e = entry(5, 0, 0, Some(now - Duration::minutes(10)), None);
        assert!(is_due(&e, now));
    }

    #[test]
    fn future_start_is_never_due() {
        let now = OffsetDateTime::now_utc();
        let e = entry(5, 0, 0, Some(now + Duration::minutes(10)), None);
        assert!(!is_due(&e, now));
    }

    #[test]
    fn zero_interval_defaults_to_one_minute() {
        let now = OffsetDateTime::now_utc();
        let e = entry(0, 0, 0, None, Some(now - Duration::seconds(90)));
        assert!(is_due(&e, now));

        let e2 = entry(0, 0, 0, None, Some(now - Duration::seconds(30)));
        assert!(!is_due(&e2, now));
    }

    #[test]
    fn interval_combines_minutes_hours_days() {
        let now = OffsetDateTime::now_utc();
        // 1 hour 1 minute = 61 minutes.
        let e = entry(1, 1, 0, None, Some(now - Duration::minutes(61)));
        assert!(is_due(&e, now));

        let e2 = entry(1, 1, 0, None, Some(now - Duration::minutes(30)));
        assert!(!is_due(&e2, now));
    }

    #[test]
    fn is_due_is_idempotent_given_same_inputs() {
        let now = OffsetDateTime::now_utc();
        let e = entry(5, 0, 0, None, Some(now - Duration::minutes(10)));
        assert_eq!(is_due(&e, now), is_due(&e, now));
    }
}
