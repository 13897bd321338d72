///! Serializable map scene types

use std::sync::Arc;

use confmap_common::{LatLng, MapViewport};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Scene shared between its owner and the current-location overlay
pub type SharedMap = Arc<RwLock<MapScene>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    /// `{s}`/`{z}`/`{x}`/`{y}` template
    pub url: String,
    pub attribution: String,
}

impl TileLayer {
    pub const OSM_URL: &'static str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
    pub const OSM_ATTRIBUTION: &'static str =
        r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

    pub fn openstreetmap() -> Self {
        Self {
            url: Self::OSM_URL.to_string(),
            attribution: Self::OSM_ATTRIBUTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub icon_url: String,
    pub icon_size: [u32; 2],
}

impl MarkerIcon {
    pub const LOCATION_SVG: &'static str = "assets/location.svg";

    pub fn location_pin() -> Self {
        Self {
            icon_url: Self::LOCATION_SVG.to_string(),
            icon_size: [48, 48],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Popup {
    Conference {
        title: String,
        location: String,
        date: String,
        url: String,
        link_label: String,
    },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: LatLng,
    /// `None` uses the map library's default pin
    pub icon: Option<MarkerIcon>,
    pub popup: Popup,
}

impl Marker {
    /// Plain pin with a text popup
    pub fn pin(position: LatLng, text: impl Into<String>) -> Self {
        Self {
            position,
            icon: None,
            popup: Popup::Text { text: text.into() },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyCircle {
    pub center: LatLng,
    /// Metres
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapScene {
    pub viewport: MapViewport,
    pub tile_layer: TileLayer,
    pub icon: MarkerIcon,
    pub markers: Vec<Marker>,
    pub scroll_wheel_zoom: bool,
    pub height: String,
    pub width: String,
    /// Set by the current-location overlay
    pub location_marker: Option<Marker>,
    pub accuracy_circle: Option<AccuracyCircle>,
}

impl MapScene {
    pub fn into_shared(self) -> SharedMap {
        Arc::new(RwLock::new(self))
    }
}
