//! Scatter projection of observations onto two chosen fields

use crate::quake::{Field, Observation};

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Points for every observation where both fields are finite, in feed order
pub fn project(observations: &[Observation], x: Field, y: Field) -> Vec<ScatterPoint> {
    observations
        .iter()
        .filter_map(|o| {
            Some(ScatterPoint {
                x: x.value(o)?,
                y: y.value(o)?,
                label: o.place.clone().unwrap_or_default(),
            })
        })
        .collect()
}

/// Dataset caption, e.g. "depth vs magnitude"
pub fn dataset_label(x: Field, y: Field) -> String {
    format!("{} vs {}", y, x)
}

/// Inclusive (min, max) of a coordinate, widened when degenerate
pub fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        return None;
    }
    if lo == hi {
        return Some((lo - 1.0, hi + 1.0));
    }
    Some((lo, hi))
}
