///! ButterCMS collection response types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `GET /v2/content/?keys=<key>` body: `{"data": {"<key>": [..]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionResponse {
    pub data: HashMap<String, Vec<RawConference>>,
}

impl CollectionResponse {
    /// Entries of the named collection, empty when the key is missing
    pub fn take_collection(mut self, key: &str) -> Vec<RawConference> {
        self.data.remove(key).unwrap_or_default()
    }
}

/// The CMS stores numbers as either JSON numbers or strings. Anything else
/// is kept so one bad entry cannot fail the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Coordinate {
    /// NaN for anything that does not parse
    pub fn as_f64(&self) -> f64 {
        match self {
            Coordinate::Number(v) => *v,
            Coordinate::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            Coordinate::Other(_) => f64::NAN,
        }
    }
}

/// One collection item as delivered by the CMS
#[derive(Debug, Clone, Deserialize)]
pub struct RawConference {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub lat: Option<Coordinate>,
    #[serde(default)]
    pub lng: Option<Coordinate>,
    /// ISO timestamp, e.g. "2026-06-13T00:00:00"
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub conference_url: String,
}
