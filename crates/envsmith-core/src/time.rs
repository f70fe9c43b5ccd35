//! Time and duration utilities.

use chrono::{DateTime, Duration, Local};

/// Timestamp embedded in backup file names, millisecond resolution.
pub fn backup_stamp(at: DateTime<Local>) -> String {
    at.format("%Y%m%d-%H%M%S%3f").to_string()
}

/// Format a duration in human-readable form.
pub fn pretty_duration(duration: Duration) -> String {
    let millis = duration.num_milliseconds();
    let secs = duration.num_seconds();

    if secs < 1 {
        format!("{}ms", millis.max(0))
    } else if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}

/// Measure execution time of a function.
pub fn measure<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Local::now();
    let result = f();
    let duration = Local::now().signed_duration_since(start);
    (result, duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backup_stamp() {
        let at = Local.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(backup_stamp(at), "20260309-070501000");
    }

    #[test]
    fn test_pretty_duration() {
        assert_eq!(pretty_duration(Duration::milliseconds(250)), "250ms");
        assert_eq!(pretty_duration(Duration::seconds(42)), "42s");
        assert_eq!(pretty_duration(Duration::seconds(125)), "2m 5s");
        assert_eq!(pretty_duration(Duration::seconds(7260)), "2h 1m");
    }
}
