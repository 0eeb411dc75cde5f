use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::operations::notation_records::NotationRecord;
use crate::store::operations::practice_records::PracticeRecord;

use super::drills::drill_popularity;
use super::percentile::percentile;
use super::{combined, round1, round2, round3};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileSet {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

impl PercentileSet {
    fn from_sorted(data: &[f64], round: fn(f64) -> f64) -> Self {
        Self {
            p25: round(percentile(data, 0.25)),
            p50: round(percentile(data, 0.50)),
            p75: round(percentile(data, 0.75)),
            p90: round(percentile(data, 0.90)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileDistributions {
    pub accuracy: PercentileSet,
    pub speed: PercentileSet,
    pub quality: PercentileSet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImprovementBenchmark {
    pub sessions: u32,
    pub avg_improvement: f64,
    pub description: String,
}

/// Anonymized cross-population snapshot: blended averages, percentile
/// distributions, fixed improvement benchmarks and drill popularity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationStats {
    pub avg_accuracy: f64,
    pub avg_speed: f64,
    pub avg_quality: f64,
    pub percentiles: PercentileDistributions,
    pub improvement_benchmarks: Vec<ImprovementBenchmark>,
    pub drill_popularity: BTreeMap<String, u64>,
}

/// Aggregates all users' records into `PopulationStats`.
///
/// Returns `None` when fewer than `min_users` are registered or no records
/// of either kind exist; insufficient data is a normal outcome the caller
/// must check for, not an error.
///
/// Pool composition mirrors the per-user profile: the accuracy pool
/// concatenates both kinds (every session counts once), the speed pool is
/// practice-only, and the quality pool takes at most one rating per
/// practice record with vividness preferred over flow.
pub fn population_stats(
    user_count: usize,
    practice: &[PracticeRecord],
    notation: &[NotationRecord],
    min_users: usize,
) -> Option<PopulationStats> {
    if user_count < min_users {
        return None;
    }
    if practice.is_empty() && notation.is_empty() {
        return None;
    }

    let mut accuracies: Vec<f64> = practice
        .iter()
        .map(|s| s.recall_accuracy)
        .chain(notation.iter().map(|s| s.accuracy))
        .collect();
    let mut speeds: Vec<f64> = practice.iter().map(|s| s.average_time).collect();
    let mut qualities: Vec<f64> = practice
        .iter()
        .filter_map(|s| s.vividness.or(s.flow))
        .map(f64::from)
        .collect();

    let avg_accuracy = mean(&accuracies);
    let avg_speed = mean(&speeds);
    let avg_quality = mean(&qualities);

    accuracies.sort_by(f64::total_cmp);
    speeds.sort_by(f64::total_cmp);
    qualities.sort_by(f64::total_cmp);

    let percentiles = PercentileDistributions {
        accuracy: PercentileSet::from_sorted(&accuracies, round2),
        speed: PercentileSet::from_sorted(&speeds, round3),
        quality: PercentileSet::from_sorted(&qualities, round1),
    };

    Some(PopulationStats {
        avg_accuracy: round2(avg_accuracy),
        avg_speed: round3(avg_speed),
        avg_quality: round1(avg_quality),
        percentiles,
        improvement_benchmarks: improvement_benchmarks(),
        drill_popularity: drill_popularity(&combined(practice, notation)),
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fixed illustrative benchmarks. These are deliberately not derived from
/// the data; the exact figures and wording are part of the public
/// interface and must stay stable.
pub fn improvement_benchmarks() -> Vec<ImprovementBenchmark> {
    vec![
        ImprovementBenchmark {
            sessions: 5,
            avg_improvement: 10.0,
            description: "Average users improve 10% accuracy after 5 sessions".to_string(),
        },
        ImprovementBenchmark {
            sessions: 10,
            avg_improvement: 15.0,
            description: "Average users improve 15% accuracy after 10 sessions".to_string(),
        },
        ImprovementBenchmark {
            sessions: 25,
            avg_improvement: 25.0,
            description: "Average users improve 25% accuracy after 25 sessions".to_string(),
        },
        ImprovementBenchmark {
            sessions: 50,
            avg_improvement: 35.0,
            description: "Average users improve 35% accuracy after 50 sessions".to_string(),
        },
    ]
}
