//! Synthetic test data for developer mode

use crate::api::Backend;
use crate::models::{Color, Feeling, NewRecord, SmellLevel, StoolType, Symptom};
use chrono::{Days, NaiveDate};
use rand::seq::IndexedRandom;
use rand::Rng;

pub const MAX_GENERATED: u32 = 30;

pub fn clamp_count(count: u32) -> u32 {
    count.clamp(1, MAX_GENERATED)
}

/// Outcome of a bulk submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    pub succeeded: usize,
    pub requested: usize,
}

impl GenerationReport {
    pub fn message(&self) -> String {
        format!("Generated {}/{} test records", self.succeeded, self.requested)
    }
}

/// One record per day starting at `start`, with randomized contents
pub fn generate_records<R: Rng>(count: u32, start: NaiveDate, rng: &mut R) -> Vec<NewRecord> {
    (0..clamp_count(count))
        .filter_map(|offset| start.checked_add_days(Days::new(u64::from(offset))))
        .map(|date| random_record(date, rng))
        .collect()
}

fn random_record<R: Rng>(date: NaiveDate, rng: &mut R) -> NewRecord {
    let hour: u32 = rng.random_range(6..=22);
    let minute: u32 = rng.random_range(0..=59);

    let symptoms = if rng.random_bool(0.4) {
        Symptom::ALL.choose(rng).copied().into_iter().collect()
    } else {
        Vec::new()
    };

    NewRecord {
        record_date: date.format("%Y-%m-%d").to_string(),
        record_time: format!("{:02}:{:02}", hour, minute),
        duration_minutes: Some(rng.random_range(1..=15)),
        stool_type: StoolType::new(rng.random_range(StoolType::MIN..=StoolType::MAX))
            .unwrap_or_default(),
        color: Color::ALL.choose(rng).copied().unwrap_or_default(),
        smell_level: SmellLevel::new(rng.random_range(SmellLevel::MIN..=SmellLevel::MAX))
            .unwrap_or_default(),
        feeling: Feeling::ALL.choose(rng).copied().unwrap_or_default(),
        symptoms,
        notes: None,
    }
}

/// Submit records one at a time; failures are logged and skipped.
/// `requested` is the clamped count asked for, which can exceed
/// `records.len()` when the date range runs off the calendar.
pub async fn submit_batch(
    backend: &dyn Backend,
    records: &[NewRecord],
    requested: u32,
) -> GenerationReport {
    let mut succeeded = 0;
    for record in records {
        match backend.create_record(record).await {
            Ok(_) => succeeded += 1,
            Err(e) => {
                tracing::warn!(date = %record.record_date, "Skipping generated record: {}", e)
            }
        }
    }

    let report = GenerationReport {
        succeeded,
        requested: requested as usize,
    };
    tracing::info!(succeeded, requested = report.requested, "Test data submitted");
    report
}
