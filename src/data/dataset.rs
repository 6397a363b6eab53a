//! The process-wide dataset snapshot.
//!
//! Built once at start-up (load → augment) and shared read-only afterwards.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::data::augment::augment;
use crate::domain::{AugmentedSeries, HistoricalRecord};
use crate::error::AppError;
use crate::io::ingest::{RowError, load_records};

#[derive(Debug, Clone)]
pub struct Dataset {
    pub historical: Vec<HistoricalRecord>,
    pub augmented: AugmentedSeries,
    /// Loader diagnostics (empty for in-memory datasets).
    pub row_errors: Vec<RowError>,
    pub seed: u64,
}

impl Dataset {
    /// Load the CSV at `path` and augment it with a `StdRng` seeded from `seed`.
    pub fn load(path: &Path, seed: u64) -> Result<Self, AppError> {
        let ingest = load_records(path)?;
        let mut dataset = Self::from_records(ingest.records, seed);
        dataset.row_errors = ingest.row_errors;
        Ok(dataset)
    }

    /// Build a snapshot from already-normalized records.
    pub fn from_records(historical: Vec<HistoricalRecord>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let augmented = augment(&historical, &mut rng);
        Self {
            historical,
            augmented,
            row_errors: Vec::new(),
            seed,
        }
    }

    /// Sources that can be forecast, sorted.
    pub fn sources(&self) -> Vec<String> {
        self.augmented.sources()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_records_augments_every_record() {
        let records = vec![
            HistoricalRecord {
                source: "Surya".to_string(),
                year: 2020,
                potential: 100.0,
            },
            HistoricalRecord {
                source: "Air".to_string(),
                year: 2018,
                potential: 30.0,
            },
        ];
        let dataset = Dataset::from_records(records, 42);
        assert_eq!(dataset.augmented.len(), 12);
        assert_eq!(dataset.sources(), vec!["Air".to_string(), "Surya".to_string()]);
        assert_eq!(dataset.seed, 42);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Dataset::load(Path::new("does/not/exist.csv"), 42).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
