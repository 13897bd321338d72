pub mod types;

pub use types::{ConferenceRecord, GeolocationFix, LatLng, LatLngBounds, MapViewport};
