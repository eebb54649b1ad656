//! Magnitude histogram over fixed half-open buckets

use crate::quake::{Field, Observation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

impl Bucket {
    /// Lower bound inclusive, upper bound exclusive
    pub fn contains(&self, magnitude: f64) -> bool {
        magnitude >= self.min && magnitude < self.max
    }
}

// The top bucket stops at 10; anything stronger lands in no bucket.
pub const BUCKETS: [Bucket; 6] = [
    Bucket { label: "0-1", min: 0.0, max: 1.0 },
    Bucket { label: "1-2", min: 1.0, max: 2.0 },
    Bucket { label: "2-3", min: 2.0, max: 3.0 },
    Bucket { label: "3-4", min: 3.0, max: 4.0 },
    Bucket { label: "4-5", min: 4.0, max: 5.0 },
    Bucket { label: "5+", min: 5.0, max: 10.0 },
];

pub fn bucket_index(magnitude: f64) -> Option<usize> {
    BUCKETS.iter().position(|b| b.contains(magnitude))
}

pub fn bucket_counts(observations: &[Observation]) -> [usize; BUCKETS.len()] {
    let mut counts = [0; BUCKETS.len()];
    for i in observations
        .iter()
        .filter_map(|o| Field::Magnitude.value(o))
        .filter_map(bucket_index)
    {
        counts[i] += 1;
    }
    counts
}
