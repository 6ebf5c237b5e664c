//! Date and review-eligibility utilities.
//!
//! Pure functions only -- every one takes the reference instant as a
//! parameter so behavior is deterministic under test. A wish becomes
//! reviewable once its creation instant is at least one week in the past,
//! boundary inclusive.

use chrono::{DateTime, Duration, Utc};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// One week before `from`.
pub fn one_week_ago(from: DateTime<Utc>) -> DateTime<Utc> {
    from - Duration::days(7)
}

/// One week after `from`.
pub fn one_week_later(from: DateTime<Utc>) -> DateTime<Utc> {
    from + Duration::days(7)
}

/// Whether a wish created at `created_at` is reviewable at `now`.
///
/// True iff `created_at <= now - 7 days`; the boundary is inclusive, so
/// exactly seven days satisfies reviewability.
pub fn is_wish_reviewable(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    created_at <= one_week_ago(now)
}

/// Signed days until `target`, by ceiling division.
///
/// Negative means overdue, zero means due today, positive means days
/// remaining.
pub fn days_until_target(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ceil_days((target - now).num_milliseconds())
}

/// Absolute whole-day difference between two instants, by ceiling
/// division. Partial days round up.
pub fn days_difference(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    ceil_days((b - a).num_milliseconds().abs())
}

/// Whether `date` falls within `[start, end]`, bounds inclusive.
pub fn is_date_in_range(date: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    date >= start && date <= end
}

/// Bucketed relative-time label for a past instant.
///
/// 0 days -> "today", 1 -> "yesterday", up to a week -> "N days ago", up
/// to a month -> "N weeks ago", older -> the absolute date.
pub fn format_relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = days_difference(date, now);
    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        2..=7 => format!("{days} days ago"),
        8..=30 => {
            let weeks = days / 7;
            if weeks == 1 {
                "1 week ago".to_string()
            } else {
                format!("{weeks} weeks ago")
            }
        }
        _ => date.format("%Y-%m-%d").to_string(),
    }
}

fn ceil_days(ms: i64) -> i64 {
    ms.div_euclid(MS_PER_DAY) + i64::from(ms.rem_euclid(MS_PER_DAY) > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn reviewable_at_exactly_seven_days() {
        // Inclusive boundary.
        let now = at("2024-01-08T00:00:00Z");
        assert!(is_wish_reviewable(at("2024-01-01T00:00:00Z"), now));
    }

    #[test]
    fn not_reviewable_one_second_short() {
        let now = at("2024-01-08T00:00:00Z");
        assert!(!is_wish_reviewable(at("2024-01-01T00:00:01Z"), now));
    }

    #[test]
    fn reviewable_one_second_past() {
        let now = at("2024-01-08T00:00:01Z");
        assert!(is_wish_reviewable(at("2024-01-01T00:00:00Z"), now));
    }

    #[test]
    fn one_week_helpers_are_inverse() {
        let base = at("2024-02-29T10:30:00Z");
        assert_eq!(one_week_ago(one_week_later(base)), base);
        assert_eq!(one_week_later(base), at("2024-03-07T10:30:00Z"));
    }

    #[test]
    fn days_until_target_positive_and_ceiling() {
        let now = at("2024-01-01T12:00:00Z");
        // A day and a half away rounds up to 2.
        assert_eq!(days_until_target(at("2024-01-03T00:00:00Z"), now), 2);
        assert_eq!(days_until_target(at("2024-01-08T12:00:00Z"), now), 7);
    }

    #[test]
    fn days_until_target_due_today_and_overdue() {
        let now = at("2024-01-08T00:00:00Z");
        assert_eq!(days_until_target(now, now), 0);
        // Half a day overdue still counts as due today under ceiling.
        assert_eq!(days_until_target(at("2024-01-07T12:00:00Z"), now), 0);
        // A full day or more overdue goes negative.
        assert_eq!(days_until_target(at("2024-01-07T00:00:00Z"), now), -1);
        assert_eq!(days_until_target(at("2024-01-05T00:00:00Z"), now), -3);
    }

    #[test]
    fn days_difference_is_symmetric() {
        let a = at("2024-01-01T00:00:00Z");
        let b = at("2024-01-04T06:00:00Z");
        assert_eq!(days_difference(a, b), 4);
        assert_eq!(days_difference(b, a), 4);
        assert_eq!(days_difference(a, a), 0);
    }

    #[test]
    fn date_in_range_inclusive_bounds() {
        let start = at("2024-01-01T00:00:00Z");
        let end = at("2024-01-08T00:00:00Z");
        assert!(is_date_in_range(start, start, end));
        assert!(is_date_in_range(end, start, end));
        assert!(!is_date_in_range(at("2024-01-08T00:00:01Z"), start, end));
    }

    #[test]
    fn relative_time_buckets() {
        let now = at("2024-03-31T12:00:00Z");
        assert_eq!(format_relative_time(now, now), "today");
        assert_eq!(
            format_relative_time(at("2024-03-30T13:00:00Z"), now),
            "yesterday"
        );
        assert_eq!(
            format_relative_time(at("2024-03-28T12:00:00Z"), now),
            "3 days ago"
        );
        assert_eq!(
            format_relative_time(at("2024-03-21T12:00:00Z"), now),
            "1 week ago"
        );
        assert_eq!(
            format_relative_time(at("2024-03-10T12:00:00Z"), now),
            "3 weeks ago"
        );
        assert_eq!(
            format_relative_time(at("2024-01-10T12:00:00Z"), now),
            "2024-01-10"
        );
    }
}
