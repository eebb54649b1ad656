//! USGS geoJSON feed loading
//!
//! Pulls the summary feed once, flattens every feature into an
//! [`Observation`] and hands the whole set back. Loading happens on a
//! worker thread so the dashboard can keep drawing while it waits.

use crate::quake::Observation;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(String),
    #[error("feed returned HTTP {status}")]
    Status { status: u16 },
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<String>,
    properties: Properties,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(default)]
    place: Option<String>,
    #[serde(default)]
    mag: Option<f64>,
    #[serde(default)]
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<Option<f64>>,  // [lon, lat, depth]
}

impl Feature {
    fn into_observation(self) -> Observation {
        let coord = |i: usize| self.geometry.coordinates.get(i).copied().flatten();
        Observation {
            longitude: coord(0),
            latitude: coord(1),
            depth: coord(2),
            id: self.id.unwrap_or_default(),
            place: self.properties.place,
            magnitude: self.properties.mag,
            timestamp: self.properties.time,
        }
    }
}

fn normalize(collection: FeatureCollection) -> Vec<Observation> {
    let observations: Vec<Observation> = collection
        .features
        .into_iter()
        .map(Feature::into_observation)
        .collect();

    let mut seen = HashSet::with_capacity(observations.len());
    for obs in &observations {
        if !seen.insert(obs.id.as_str()) {
            warn!(id = %obs.id, "duplicate event id in feed");
        }
    }
    observations
}

/// Parse a geoJSON feature collection already held in memory
pub fn parse_feed(body: &str) -> Result<Vec<Observation>, FeedError> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    Ok(normalize(collection))
}

/// Load a feed saved to disk
pub fn load_file(path: &Path) -> Result<Vec<Observation>, FeedError> {
    let body = fs::read_to_string(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_feed(&body)
}

/// Fetch and normalize the remote feed (blocking, single attempt)
pub fn fetch_feed(url: &str, timeout: Duration) -> Result<Vec<Observation>, FeedError> {
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();

    let response = match agent.get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => return Err(FeedError::Status { status }),
        Err(e) => return Err(FeedError::Network(e.to_string())),
    };

    let body = response
        .into_string()
        .map_err(|e| FeedError::Network(e.to_string()))?;
    debug!(bytes = body.len(), "feed body received");
    parse_feed(&body)
}

/// Where observations come from
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    Url { url: String, timeout: Duration },
    File(PathBuf),
}

impl FeedSource {
    pub fn describe(&self) -> String {
        match self {
            FeedSource::Url { url, .. } => url.clone(),
            FeedSource::File(path) => path.display().to_string(),
        }
    }

    /// Blocking load from whichever source this is
    pub fn load(&self) -> Result<Vec<Observation>, FeedError> {
        let result = match self {
            FeedSource::Url { url, timeout } => fetch_feed(url, *timeout),
            FeedSource::File(path) => load_file(path),
        };
        match &result {
            Ok(obs) => info!(source = %self.describe(), count = obs.len(), "feed loaded"),
            Err(e) => error!(source = %self.describe(), error = %e, "feed load failed"),
        }
        result
    }
}

/// Runs feed loads on a worker thread, at most one at a time
pub struct FeedLoader {
    source: FeedSource,
    pending: bool,
    receiver: Receiver<Result<Vec<Observation>, FeedError>>,
    sender: Sender<Result<Vec<Observation>, FeedError>>,
}

impl FeedLoader {
    pub fn new(source: FeedSource) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            pending: false,
            receiver: rx,
            sender: tx,
        }
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start a load. Returns false if one is already in flight.
    pub fn request(&mut self) -> bool {
        if self.pending {
            debug!("load already in flight, ignoring request");
            return false;
        }
        self.pending = true;

        let source = self.source.clone();
        let tx = self.sender.clone();
        thread::spawn(move || {
            let _ = tx.send(source.load());
        });
        true
    }

    /// Completed load, if one has arrived since the last poll
    pub fn poll(&mut self) -> Option<Result<Vec<Observation>, FeedError>> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.pending = false;
                Some(result)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
