//! Priority classification.
//!
//! # Invariants
//! - Pure and deterministic for the same `(title, description, deadline, now)`.
//! - Keyword matching is case-insensitive substring matching, so `nowhere`
//!   still matches `now`.
//! - Past deadlines yield a non-positive day count and classify as immediate.

use crate::model::task::Priority;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const IMMEDIATE_WINDOW_DAYS: i64 = 2;
const IMPORTANT_WINDOW_DAYS: i64 = 7;

static URGENT_KEYWORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"urgent|asap|immediately|critical|emergency|now").expect("valid urgent regex")
});
static IMPORTANT_KEYWORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"important|meeting|deadline|exam|presentation|project")
        .expect("valid important regex")
});

/// Classifies a task into a priority tier.
///
/// First match wins:
/// 1. due within 2 days, or an urgent keyword → `Immediate`
/// 2. due within 7 days, or an important keyword → `Important`
/// 3. otherwise → `Least`
pub fn classify(
    title: &str,
    description: &str,
    deadline: NaiveDate,
    now: DateTime<Utc>,
) -> Priority {
    let days = days_until_deadline(deadline, now);
    let haystack = format!("{title} {description}").to_lowercase();

    if days <= IMMEDIATE_WINDOW_DAYS || URGENT_KEYWORDS_RE.is_match(&haystack) {
        return Priority::Immediate;
    }
    if days <= IMPORTANT_WINDOW_DAYS || IMPORTANT_KEYWORDS_RE.is_match(&haystack) {
        return Priority::Important;
    }
    Priority::Least
}

/// Whole days until `deadline` (UTC midnight), rounding partial days up.
pub fn days_until_deadline(deadline: NaiveDate, now: DateTime<Utc>) -> i64 {
    let deadline_at = deadline_instant(deadline);
    let diff_ms = (deadline_at - now).num_milliseconds();
    // ceil division for signed values
    let days = diff_ms.div_euclid(MS_PER_DAY);
    if diff_ms.rem_euclid(MS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// Instant a deadline date starts at.
pub fn deadline_instant(deadline: NaiveDate) -> DateTime<Utc> {
    deadline.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::days_until_deadline;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn partial_days_round_up() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let date = |d| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();

        assert_eq!(days_until_deadline(date(20), now), 1);
        assert_eq!(days_until_deadline(date(22), now), 3);
        assert_eq!(days_until_deadline(date(19), now), 0);
        assert_eq!(days_until_deadline(date(10), now), -9);
    }

    #[test]
    fn exact_midnight_is_whole_days() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        let deadline = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
        assert_eq!(days_until_deadline(deadline, now), 2);
    }
}
