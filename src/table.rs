//! Tabular view of the loaded observations

use crate::quake::{format_number, Observation};
use chrono::{DateTime, TimeZone};

pub const HEADERS: [&str; 4] = ["Place", "Magnitude", "Depth", "Time"];

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub place: String,
    pub magnitude: String,
    pub depth: String,
    pub time: String,
}

impl TableRow {
    pub fn cells(&self) -> [&str; 4] {
        [&self.place, &self.magnitude, &self.depth, &self.time]
    }
}

/// How the Time column is written
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeFormat {
    /// "11/14/2023, 10:13:20 PM"
    Long,
    /// "11/14 22:13", for narrow tables
    Short,
}

impl TimeFormat {
    /// Widest string this format produces
    pub fn width(&self) -> usize {
        match self {
            TimeFormat::Long => 23,
            TimeFormat::Short => 11,
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            TimeFormat::Long => "%-m/%-d/%Y, %-I:%M:%S %p",
            TimeFormat::Short => "%-m/%-d %H:%M",
        }
    }
}

/// Timestamp in the given zone, "Invalid Date" when out of range
pub fn format_timestamp<Tz: TimeZone>(millis: i64, tz: &Tz, format: TimeFormat) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(tz).format(format.pattern()).to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// One row per observation in feed order; nothing is filtered out
pub fn table_rows<Tz: TimeZone>(observations: &[Observation], tz: &Tz, format: TimeFormat) -> Vec<TableRow>
where
    Tz::Offset: std::fmt::Display,
{
    observations
        .iter()
        .map(|o| TableRow {
            place: o.place.clone().unwrap_or_default(),
            magnitude: format_number(o.magnitude),
            depth: format_number(o.depth),
            time: o
                .timestamp
                .map(|ms| format_timestamp(ms, tz, format))
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quake::sample;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn single_event_row() {
        let obs = vec![sample("ev1", "Test Location", Some(3.5), Some(10.0))];
        let rows = table_rows(&obs, &Utc, TimeFormat::Long);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].cells(),
            ["Test Location", "3.5", "10", "11/14/2023, 10:13:20 PM"]
        );
    }

    #[test]
    fn timestamp_follows_zone() {
        let pst = FixedOffset::west_opt(8 * 3600).unwrap();
        assert_eq!(format_timestamp(1_700_000_000_000, &pst, TimeFormat::Long), "11/14/2023, 2:13:20 PM");
        assert_eq!(format_timestamp(0, &Utc, TimeFormat::Long), "1/1/1970, 12:00:00 AM");
        assert_eq!(format_timestamp(i64::MAX, &Utc, TimeFormat::Short), "Invalid Date");
    }

    #[test]
    fn short_format_is_24_hour() {
        let pst = FixedOffset::west_opt(8 * 3600).unwrap();
        assert_eq!(format_timestamp(1_700_000_000_000, &Utc, TimeFormat::Short), "11/14 22:13");
        assert_eq!(format_timestamp(1_700_000_000_000, &pst, TimeFormat::Short), "11/14 14:13");
        assert!(format_timestamp(1_700_000_000_000, &Utc, TimeFormat::Long).len() <= TimeFormat::Long.width());
    }

    #[test]
    fn no_observations_no_rows() {
        assert!(table_rows(&[], &Utc, TimeFormat::Short).is_empty());
    }

    #[test]
    fn rows_keep_order_and_blank_missing_values() {
        let mut b = sample("b", "Second", None, None);
        b.timestamp = None;
        let obs = vec![sample("a", "First", Some(10.2), Some(1.0)), b];
        let rows = table_rows(&obs, &Utc, TimeFormat::Long);
        assert_eq!(rows[0].place, "First");
        assert_eq!(rows[0].magnitude, "10.2");
        assert_eq!(rows[1].cells(), ["Second", "", "", ""]);
    }
}
