//! Statistics aggregation engine.
//!
//! Turns raw session records into a per-user performance profile
//! ([`user::UserStats`]) and an anonymized cross-population benchmark
//! ([`population::PopulationStats`]). Every function here is a pure
//! snapshot computation over already-materialized record collections:
//! no I/O, no shared state, same inputs always produce the same output.

pub mod drills;
pub mod percentile;
pub mod population;
pub mod streak;
pub mod user;

use chrono::{DateTime, Utc};

use crate::store::operations::notation_records::NotationRecord;
use crate::store::operations::practice_records::PracticeRecord;

/// Read-only view shared by both session record kinds.
///
/// Practice and notation records are stored with different schemas and are
/// never merged; each kind maps its own fields onto this interface so the
/// aggregators can treat them uniformly.
pub trait SessionRecord {
    fn drill_type(&self) -> &str;
    fn session_date(&self) -> DateTime<Utc>;
    /// Recall accuracy as a 0-100 percentage.
    fn accuracy(&self) -> f64;
    /// Average per-item time in seconds; lower is better.
    fn speed(&self) -> f64;
    /// Subjective 1-5 quality rating, for drills that capture one.
    /// A record contributes at most one value; vividness wins over flow.
    fn quality(&self) -> Option<u8>;
}

impl SessionRecord for PracticeRecord {
    fn drill_type(&self) -> &str {
        &self.drill_type
    }

    fn session_date(&self) -> DateTime<Utc> {
        self.session_date
    }

    fn accuracy(&self) -> f64 {
        self.recall_accuracy
    }

    fn speed(&self) -> f64 {
        self.average_time
    }

    fn quality(&self) -> Option<u8> {
        self.vividness.or(self.flow)
    }
}

impl SessionRecord for NotationRecord {
    fn drill_type(&self) -> &str {
        &self.drill_type
    }

    fn session_date(&self) -> DateTime<Utc> {
        self.session_date
    }

    fn accuracy(&self) -> f64 {
        self.accuracy
    }

    fn speed(&self) -> f64 {
        self.average_time
    }

    fn quality(&self) -> Option<u8> {
        None
    }
}

/// Flattens both record kinds into one dyn view for the cross-kind
/// aggregators (streak, drill breakdown, popularity).
pub fn combined<'a>(
    practice: &'a [PracticeRecord],
    notation: &'a [NotationRecord],
) -> Vec<&'a dyn SessionRecord> {
    practice
        .iter()
        .map(|r| r as &dyn SessionRecord)
        .chain(notation.iter().map(|r| r as &dyn SessionRecord))
        .collect()
}

/// Ratios are rounded once, at the boundary of the result objects:
/// two decimals for percentages, three for seconds, one for quality.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
