//! Normalized earthquake records and the numeric fields they can be projected on.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One earthquake from the feed, flattened out of its geoJSON feature
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub id: String,
    pub place: Option<String>,
    pub magnitude: Option<f64>,
    pub depth: Option<f64>,      // km
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<i64>,  // epoch millis
}

/// Numeric field selectable as a scatter axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    #[serde(alias = "mag")]
    Magnitude,
    Depth,
    #[serde(alias = "lat")]
    Latitude,
    #[serde(alias = "lon", alias = "lng")]
    Longitude,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Magnitude,
        Field::Depth,
        Field::Latitude,
        Field::Longitude,
    ];

    /// Finite value of this field, or None if absent/NaN/infinite
    pub fn value(&self, obs: &Observation) -> Option<f64> {
        let v = match self {
            Field::Magnitude => obs.magnitude,
            Field::Depth => obs.depth,
            Field::Latitude => obs.latitude,
            Field::Longitude => obs.longitude,
        }?;
        v.is_finite().then_some(v)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::Magnitude => "magnitude",
            Field::Depth => "depth",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
        }
    }

    pub fn next(&self) -> Self {
        let i = self.index();
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let i = self.index();
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mag" | "magnitude" => Ok(Field::Magnitude),
            "depth" => Ok(Field::Depth),
            "lat" | "latitude" => Ok(Field::Latitude),
            "lon" | "lng" | "longitude" => Ok(Field::Longitude),
            other => Err(format!(
                "unknown field '{}' (expected magnitude, depth, latitude or longitude)",
                other
            )),
        }
    }
}

/// Render a number the way a JS engine prints it: `10` not `10.0`
pub fn format_number(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) fn sample(id: &str, place: &str, mag: Option<f64>, depth: Option<f64>) -> Observation {
    Observation {
        id: id.to_string(),
        place: Some(place.to_string()),
        magnitude: mag,
        depth,
        latitude: Some(34.0),
        longitude: Some(-118.0),
        timestamp: Some(1_700_000_000_000),
    }
}
