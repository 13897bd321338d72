///! Map renderer - viewport, base tiles and one marker per conference

use confmap_common::{ConferenceRecord, MapViewport};
use serde::{Deserialize, Serialize};

use super::marker::LocationMarker;
use super::scene::{MapScene, MarkerIcon, TileLayer};

/// Whether map primitives can be created at all. Resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderSurface {
    Available,
    Headless,
}

impl RenderSurface {
    pub fn from_headless_flag(headless: bool) -> Self {
        if headless {
            RenderSurface::Headless
        } else {
            RenderSurface::Available
        }
    }
}

pub struct MapRenderer {
    surface: RenderSurface,
    zoom: u8,
}

impl MapRenderer {
    const CONTAINER_HEIGHT: &'static str = "800px";
    const CONTAINER_WIDTH: &'static str = "100%";

    pub fn new(surface: RenderSurface) -> Self {
        Self {
            surface,
            zoom: MapViewport::DEFAULT_ZOOM,
        }
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Compose the scene. Returns `None` without touching any map primitive
    /// when there is no rendering surface.
    pub fn render(&self, records: &[ConferenceRecord]) -> Option<MapScene> {
        if self.surface == RenderSurface::Headless {
            tracing::debug!("No rendering surface, skipping map initialization");
            return None;
        }

        let center = records
            .first()
            .and_then(ConferenceRecord::position)
            .unwrap_or(MapViewport::DEFAULT_CENTER);

        let icon = MarkerIcon::location_pin();
        let location_marker = LocationMarker::new(&icon);

        let mut markers = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match location_marker.render(record) {
                Some(marker) => markers.push(marker),
                None => tracing::warn!(
                    "Skipping conference #{} '{}': coordinates ({}, {}) are not renderable",
                    index,
                    record.title,
                    record.lat,
                    record.lng
                ),
            }
        }

        tracing::info!(
            "Composed map with {} markers ({} records), centered at {}",
            markers.len(),
            records.len(),
            center
        );

        Some(MapScene {
            viewport: MapViewport::new(center, self.zoom),
            tile_layer: TileLayer::openstreetmap(),
            icon,
            markers,
            scroll_wheel_zoom: false,
            height: Self::CONTAINER_HEIGHT.to_string(),
            width: Self::CONTAINER_WIDTH.to_string(),
            location_marker: None,
            accuracy_circle: None,
        })
    }
}
