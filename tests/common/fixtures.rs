use chrono::{DateTime, Utc};

use training_backend::store::operations::notation_records::NotationRecord;
use training_backend::store::operations::practice_records::PracticeRecord;
use training_backend::store::Store;

pub struct PracticeSeed {
    pub drill_type: &'static str,
    pub session_date: DateTime<Utc>,
    pub recall_accuracy: f64,
    pub average_time: f64,
    pub pair_count: u32,
    pub vividness: Option<u8>,
    pub flow: Option<u8>,
}

impl Default for PracticeSeed {
    fn default() -> Self {
        Self {
            drill_type: "letter-pairs",
            session_date: Utc::now(),
            recall_accuracy: 80.0,
            average_time: 10.0,
            pair_count: 12,
            vividness: None,
            flow: None,
        }
    }
}

pub fn seed_practice_record(store: &Store, user_id: &str, seed: PracticeSeed) -> PracticeRecord {
    let record = PracticeRecord {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        session_date: seed.session_date,
        drill_type: seed.drill_type.to_string(),
        pair_count: seed.pair_count,
        pairs: vec![],
        timings: vec![],
        average_time: seed.average_time,
        total_time: None,
        recall_accuracy: seed.recall_accuracy,
        vividness: seed.vividness,
        flow: seed.flow,
        notes: None,
        created_at: Utc::now(),
    };
    store
        .create_practice_record(&record)
        .expect("create seed practice record");
    record
}

pub struct NotationSeed {
    pub drill_type: &'static str,
    pub session_date: DateTime<Utc>,
    pub accuracy: f64,
    pub average_time: f64,
}

impl Default for NotationSeed {
    fn default() -> Self {
        Self {
            drill_type: "edges",
            session_date: Utc::now(),
            accuracy: 70.0,
            average_time: 5.0,
        }
    }
}

pub fn seed_notation_record(store: &Store, user_id: &str, seed: NotationSeed) -> NotationRecord {
    let record = NotationRecord {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        session_date: seed.session_date,
        drill_type: seed.drill_type.to_string(),
        attempts: vec![],
        total_pieces: 10,
        correct_count: (seed.accuracy / 10.0) as u32,
        accuracy: seed.accuracy,
        average_time: seed.average_time,
        total_time: None,
        notes: None,
        created_at: Utc::now(),
    };
    store
        .create_notation_record(&record)
        .expect("create seed notation record");
    record
}
