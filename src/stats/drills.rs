use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::{round2, round3, SessionRecord};

/// Per-drill aggregate across both record kinds. Best speed is the
/// minimum, since lower times are better.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillStats {
    pub drill_type: String,
    pub session_count: u32,
    pub best_accuracy: f64,
    pub best_speed: f64,
    pub avg_accuracy: f64,
    pub avg_speed: f64,
}

struct DrillAccumulator {
    drill_type: String,
    accuracies: Vec<f64>,
    speeds: Vec<f64>,
}

impl DrillAccumulator {
    fn new(drill_type: &str) -> Self {
        Self {
            drill_type: drill_type.to_string(),
            accuracies: Vec::new(),
            speeds: Vec::new(),
        }
    }

    fn push(&mut self, record: &dyn SessionRecord) {
        self.accuracies.push(record.accuracy());
        self.speeds.push(record.speed());
    }

    fn finish(self) -> DrillStats {
        let count = self.accuracies.len();
        let best_accuracy = self.accuracies.iter().copied().fold(0.0, f64::max);
        // An empty bucket would leave the fold at infinity; emit 0.0 instead.
        let best_speed = self.speeds.iter().copied().fold(f64::INFINITY, f64::min);
        let best_speed = if best_speed.is_finite() { best_speed } else { 0.0 };
        let (avg_accuracy, avg_speed) = if count > 0 {
            (
                self.accuracies.iter().sum::<f64>() / count as f64,
                self.speeds.iter().sum::<f64>() / count as f64,
            )
        } else {
            (0.0, 0.0)
        };

        DrillStats {
            drill_type: self.drill_type,
            session_count: count as u32,
            best_accuracy: round2(best_accuracy),
            best_speed: round3(best_speed),
            avg_accuracy: round2(avg_accuracy),
            avg_speed: round3(avg_speed),
        }
    }
}

/// Stats mode: groups both record kinds by drill type into one combined
/// bucket per type. The output preserves first-encounter order; callers
/// wanting a sorted view sort explicitly.
pub fn drill_breakdown(records: &[&dyn SessionRecord]) -> Vec<DrillStats> {
    let mut buckets: Vec<DrillAccumulator> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let slot = *index
            .entry(record.drill_type().to_string())
            .or_insert_with(|| {
                buckets.push(DrillAccumulator::new(record.drill_type()));
                buckets.len() - 1
            });
        buckets[slot].push(*record);
    }

    buckets.into_iter().map(DrillAccumulator::finish).collect()
}

/// Popularity mode: session counts per drill type across both kinds.
/// Keyed by a BTreeMap so serialized output is deterministic.
pub fn drill_popularity(records: &[&dyn SessionRecord]) -> BTreeMap<String, u64> {
    let mut popularity: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        *popularity.entry(record.drill_type().to_string()).or_insert(0) += 1;
    }
    popularity
}
