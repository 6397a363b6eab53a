//! Synthetic training series generation from sparse history.
//!
//! Every historical record `(source, year, potential)` is expanded into six
//! yearly points `(year + i, potential + i * g_i)` for `i = 0..=5`, where `g_i`
//! is a fresh uniform draw from the source category's growth range.
//!
//! The RNG is passed in by the caller. With a seeded `StdRng` the series is
//! reproducible, but the draws are consumed in record order, so reordering the
//! input changes the output.

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::domain::{AugmentedSeries, HistoricalRecord, SeriesPoint, SourceCategory};

/// Number of synthetic points generated per historical record.
pub const POINTS_PER_RECORD: u8 = 6;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Expand historical records into the augmented training series.
pub fn augment<R: Rng + ?Sized>(records: &[HistoricalRecord], rng: &mut R) -> AugmentedSeries {
    let fast = growth_distribution(SourceCategory::Fast);
    let moderate = growth_distribution(SourceCategory::Moderate);
    let flat = growth_distribution(SourceCategory::Flat);

    let mut points = Vec::with_capacity(records.len() * POINTS_PER_RECORD as usize);
    for record in records {
        let growth = match SourceCategory::of(&record.source) {
            SourceCategory::Fast => &fast,
            SourceCategory::Moderate => &moderate,
            SourceCategory::Flat => &flat,
        };

        for offset in 0..POINTS_PER_RECORD {
            // Offset 0 still consumes a draw; `0.0 * g` keeps the start value exact.
            let g = growth.sample(rng);
            let Some(year) = record.year.checked_add(i32::from(offset)) else {
                break;
            };
            points.push(SeriesPoint {
                source: record.source.clone(),
                year,
                potential: record.potential + f64::from(offset) * g,
                offset,
            });
        }
    }

    AugmentedSeries { points }
}

fn growth_distribution(category: SourceCategory) -> Uniform<f64> {
    let (low, high) = category.growth_range();
    Uniform::new(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn record(source: &str, year: i32, potential: f64) -> HistoricalRecord {
        HistoricalRecord {
            source: source.to_string(),
            year,
            potential,
        }
    }

    #[test]
    fn years_stop_at_the_end_of_the_calendar() {
        let records = vec![record("Air", i32::MAX - 2, 1.0)];
        let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);
        let series = augment(&records, &mut rng);
        let years: Vec<i32> = series.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![i32::MAX - 2, i32::MAX - 1, i32::MAX]);
    }

    #[test]
    fn each_record_yields_six_contiguous_years() {
        let records = vec![record("Surya", 2020, 100.0), record("Panas Bumi", 2015, 40.0)];
        let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);
        let series = augment(&records, &mut rng);

        assert_eq!(series.len(), 12);
        for (chunk, rec) in series.points.chunks(6).zip(&records) {
            let years: Vec<i32> = chunk.iter().map(|p| p.year).collect();
            let expected: Vec<i32> = (rec.year..rec.year + 6).collect();
            assert_eq!(years, expected);
            assert_eq!(chunk[0].potential, rec.potential);
            assert!(chunk.iter().all(|p| p.source == rec.source));
        }
    }

    #[test]
    fn fast_growth_sources_never_shrink() {
        let records = vec![record("Surya", 2020, 100.0)];
        let mut rng = StdRng::seed_from_u64(7);
        let series = augment(&records, &mut rng);

        assert_eq!(series.len(), 6);
        for p in &series.points {
            assert!(p.potential >= 100.0);
            let i = f64::from(p.offset);
            if p.offset > 0 {
                let g = (p.potential - 100.0) / i;
                assert!((1.5..3.0).contains(&g), "growth {g} outside fast range");
            }
        }
    }

    #[test]
    fn moderate_growth_stays_in_range() {
        let records = vec![record("Bioenergi", 2018, 10.0)];
        let mut rng = StdRng::seed_from_u64(3);
        let series = augment(&records, &mut rng);
        for p in series.points.iter().filter(|p| p.offset > 0) {
            let g = (p.potential - 10.0) / f64::from(p.offset);
            assert!((0.8..1.5).contains(&g));
        }
    }

    #[test]
    fn same_seed_reproduces_series() {
        let records = vec![record("Angin", 2019, 5.0), record("Air", 2019, 9.0)];
        let a = augment(&records, &mut StdRng::seed_from_u64(42));
        let b = augment(&records, &mut StdRng::seed_from_u64(42));
        let c = augment(&records, &mut StdRng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn no_records_no_points() {
        let series = augment(&[], &mut StdRng::seed_from_u64(1));
        assert!(series.is_empty());
        assert!(series.sources().is_empty());
    }
}
