//! Training data: the seeded augmenter and the shared dataset snapshot.

pub mod augment;
pub mod dataset;

pub use augment::{DEFAULT_SEED, POINTS_PER_RECORD, augment};
pub use dataset::Dataset;
