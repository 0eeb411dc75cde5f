use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Practice-streak summary over a set of session timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub last_session_date: Option<DateTime<Utc>>,
    pub days_since_last_session: i64,
}

impl StreakSummary {
    fn empty() -> Self {
        Self {
            current_streak: 0,
            last_session_date: None,
            days_since_last_session: 0,
        }
    }
}

/// Computes the current consecutive-day streak from session timestamps
/// (both record kinds mixed).
///
/// Timestamps are reduced to calendar dates, so multiple sessions on one
/// day count once. The walk starts at the most recent practiced date and
/// steps backward one day at a time; the first gap ends the streak.
/// `today` is passed in by the caller so the computation stays pure.
pub fn streak_summary(timestamps: &[DateTime<Utc>], today: NaiveDate) -> StreakSummary {
    let Some(last) = timestamps.iter().max().copied() else {
        return StreakSummary::empty();
    };

    let practiced: BTreeSet<NaiveDate> = timestamps.iter().map(|t| t.date_naive()).collect();
    let last_date = last.date_naive();
    let days_since = (today - last_date).num_days();

    let mut streak = 0u32;
    let mut cursor = last_date;
    while practiced.contains(&cursor) {
        streak += 1;
        cursor = match cursor.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }

    StreakSummary {
        current_streak: streak,
        last_session_date: Some(last),
        days_since_last_session: days_since,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(days_ago: i64, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, hour, 0, 0).unwrap() - Duration::days(days_ago)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
    }

    #[test]
    fn empty_input_is_all_zero() {
        let summary = streak_summary(&[], today());
        assert_eq!(summary.current_streak, 0);
        assert_eq!(summary.last_session_date, None);
        assert_eq!(summary.days_since_last_session, 0);
    }

    #[test]
    fn three_consecutive_days_count_three() {
        let summary = streak_summary(&[at(0, 9), at(1, 9), at(2, 9)], today());
        assert_eq!(summary.current_streak, 3);
        assert_eq!(summary.days_since_last_session, 0);
    }

    #[test]
    fn duplicate_day_does_not_change_streak() {
        let summary = streak_summary(&[at(0, 9), at(1, 9), at(1, 21), at(2, 9)], today());
        assert_eq!(summary.current_streak, 3);
    }

    #[test]
    fn gap_breaks_the_walk() {
        // Sessions today, yesterday and three days ago; the missing day
        // stops the count at 2.
        let summary = streak_summary(&[at(0, 9), at(1, 9), at(3, 9)], today());
        assert_eq!(summary.current_streak, 2);
    }

    #[test]
    fn streak_anchors_at_last_practiced_day_not_today() {
        // Last session was two days ago; the streak still counts from there.
        let summary = streak_summary(&[at(2, 9), at(3, 9)], today());
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.days_since_last_session, 2);
    }

    #[test]
    fn last_session_keeps_full_timestamp() {
        let evening = at(0, 21);
        let summary = streak_summary(&[at(0, 9), evening], today());
        assert_eq!(summary.last_session_date, Some(evening));
    }
}
