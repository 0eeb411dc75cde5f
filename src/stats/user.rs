use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::store::operations::notation_records::NotationRecord;
use crate::store::operations::practice_records::PracticeRecord;

use super::drills::{drill_breakdown, DrillStats};
use super::streak::streak_summary;
use super::{combined, round2, round3};

/// One user's lifetime performance profile. Fully derived from the input
/// collections; a user with zero sessions gets an all-zero profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub total_sessions: u32,
    pub total_pairs: u64,
    pub avg_accuracy: f64,
    pub avg_speed: f64,
    pub best_accuracy: f64,
    pub best_speed: f64,
    pub best_quality: u8,
    pub current_streak: u32,
    pub last_session_date: Option<DateTime<Utc>>,
    pub days_since_last_session: i64,
    pub drill_stats: Vec<DrillStats>,
}

/// Aggregates one user's practice and notation records.
///
/// Speed and quality come from practice records only; notation timings
/// feed the per-drill breakdown but not the top-level speed fields.
/// Notation accuracy is blended into the overall average with a
/// count-weighted mean, while best accuracy is the plain max across both
/// kinds. `today` anchors the streak/day-count fields.
pub fn user_stats(
    practice: &[PracticeRecord],
    notation: &[NotationRecord],
    today: NaiveDate,
) -> UserStats {
    let total_sessions = practice.len() + notation.len();
    let total_pairs: u64 = practice.iter().map(|s| u64::from(s.pair_count)).sum();

    let mut avg_accuracy = 0.0;
    let mut avg_speed = 0.0;
    let mut best_accuracy = 0.0;
    let mut best_speed = 0.0;
    let mut best_quality = 0u8;

    if !practice.is_empty() {
        let n = practice.len() as f64;
        avg_accuracy = practice.iter().map(|s| s.recall_accuracy).sum::<f64>() / n;
        avg_speed = practice.iter().map(|s| s.average_time).sum::<f64>() / n;
        best_accuracy = practice
            .iter()
            .map(|s| s.recall_accuracy)
            .fold(0.0, f64::max);
        best_speed = practice
            .iter()
            .map(|s| s.average_time)
            .fold(f64::INFINITY, f64::min);
        best_quality = practice
            .iter()
            .filter_map(|s| s.vividness.or(s.flow))
            .max()
            .unwrap_or(0);
    }
    if !best_speed.is_finite() {
        best_speed = 0.0;
    }

    if !notation.is_empty() {
        let notation_n = notation.len() as f64;
        let notation_avg = notation.iter().map(|s| s.accuracy).sum::<f64>() / notation_n;
        // Count-weighted blend: every individual session carries the same
        // weight regardless of kind.
        avg_accuracy = (avg_accuracy * practice.len() as f64 + notation_avg * notation_n)
            / total_sessions as f64;

        let notation_best = notation.iter().map(|s| s.accuracy).fold(0.0, f64::max);
        best_accuracy = best_accuracy.max(notation_best);
    }

    let all = combined(practice, notation);
    let timestamps: Vec<DateTime<Utc>> = all.iter().map(|r| r.session_date()).collect();
    let streak = streak_summary(&timestamps, today);
    let drill_stats = drill_breakdown(&all);

    UserStats {
        total_sessions: total_sessions as u32,
        total_pairs,
        avg_accuracy: round2(avg_accuracy),
        avg_speed: round3(avg_speed),
        best_accuracy: round2(best_accuracy),
        best_speed: round3(best_speed),
        best_quality,
        current_streak: streak.current_streak,
        last_session_date: streak.last_session_date,
        days_since_last_session: streak.days_since_last_session,
        drill_stats,
    }
}
