use serde::{Deserialize, Serialize};

/// Equatorial circumference used by Leaflet for metre/degree conversion
const EARTH_CIRCUMFERENCE_METERS: f64 = 40_075_017.0;

/// WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Square box of `size_in_meters` on each side centered on this point
    pub fn to_bounds(&self, size_in_meters: f64) -> LatLngBounds {
        let lat_accuracy = 180.0 * size_in_meters / EARTH_CIRCUMFERENCE_METERS;
        let lng_accuracy = lat_accuracy / (self.lat.to_radians()).cos();

        LatLngBounds {
            south_west: LatLng::new(self.lat - lat_accuracy, self.lng - lng_accuracy),
            north_east: LatLng::new(self.lat + lat_accuracy, self.lng + lng_accuracy),
        }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

/// One conference entry from the CMS collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceRecord {
    pub title: String,
    /// Human-readable place name
    pub location: String,
    /// Display text, either a timestamp or a relative string like "in 3 months"
    pub date: String,
    pub lat: f64,
    pub lng: f64,
    pub conference_url: String,
}

impl ConferenceRecord {
    /// Marker position, `None` when the coordinates are not finite
    pub fn position(&self) -> Option<LatLng> {
        let pos = LatLng::new(self.lat, self.lng);
        pos.is_finite().then_some(pos)
    }

    pub fn is_renderable(&self) -> bool {
        self.position().is_some()
    }
}

/// Map center and zoom level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapViewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl MapViewport {
    pub const DEFAULT_CENTER: LatLng = LatLng::new(40.741895, -73.989308);
    pub const DEFAULT_ZOOM: u8 = 13;

    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }

    /// Move the center, keeping the current zoom
    pub fn recenter(&mut self, center: LatLng) {
        self.center = center;
    }
}

impl Default for MapViewport {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CENTER, Self::DEFAULT_ZOOM)
    }
}

/// A single device position reported by a geolocation source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeolocationFix {
    pub latlng: LatLng,
    /// Accuracy radius in metres
    pub accuracy: f64,
}

impl GeolocationFix {
    pub fn new(lat: f64, lng: f64, accuracy: f64) -> Self {
        Self {
            latlng: LatLng::new(lat, lng),
            accuracy,
        }
    }

    /// Bounding box of the accuracy circle
    pub fn bounds(&self) -> LatLngBounds {
        self.latlng.to_bounds(self.accuracy * 2.0)
    }
}
