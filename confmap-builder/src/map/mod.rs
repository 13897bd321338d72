///! Map scene composition
///!
///! Builds the serializable scene (viewport, tiles, markers) from conference
///! records and lets the current-location overlay mutate it.

pub mod geolocation;
pub mod marker;
pub mod overlay;
pub mod renderer;
pub mod scene;

pub use geolocation::{DeniedLocation, FixedLocation, GeolocationError, GeolocationProvider, ScriptedLocation};
pub use marker::LocationMarker;
pub use overlay::{CurrentLocationOverlay, LocateMode, OverlayHandle};
pub use renderer::{MapRenderer, RenderSurface};
pub use scene::{AccuracyCircle, MapScene, Marker, MarkerIcon, Popup, SharedMap, TileLayer};
