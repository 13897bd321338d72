///! Geolocation capability
///!
///! The overlay never talks to a device directly; it asks an injected
///! provider for a fix.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use confmap_common::GeolocationFix;
use thiserror::Error;

/// Mirrors the browser's `GeolocationPositionError` codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("geolocation permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("geolocation request timed out")]
    Timeout,
}

impl GeolocationError {
    pub fn code(&self) -> u8 {
        match self {
            GeolocationError::PermissionDenied => 1,
            GeolocationError::PositionUnavailable => 2,
            GeolocationError::Timeout => 3,
        }
    }
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn request_location(&self) -> Result<GeolocationFix, GeolocationError>;
}

/// Always reports the same position
pub struct FixedLocation(pub GeolocationFix);

#[async_trait]
impl GeolocationProvider for FixedLocation {
    async fn request_location(&self) -> Result<GeolocationFix, GeolocationError> {
        Ok(self.0)
    }
}

/// Always refuses
pub struct DeniedLocation;

#[async_trait]
impl GeolocationProvider for DeniedLocation {
    async fn request_location(&self) -> Result<GeolocationFix, GeolocationError> {
        Err(GeolocationError::PermissionDenied)
    }
}

/// Replays a fixed sequence of results, then reports `PositionUnavailable`
pub struct ScriptedLocation {
    results: Mutex<VecDeque<Result<GeolocationFix, GeolocationError>>>,
}

impl ScriptedLocation {
    pub fn new(results: impl IntoIterator<Item = Result<GeolocationFix, GeolocationError>>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.results.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl GeolocationProvider for ScriptedLocation {
    async fn request_location(&self) -> Result<GeolocationFix, GeolocationError> {
        let next = self
            .results
            .lock()
            .map_err(|_| GeolocationError::PositionUnavailable)?
            .pop_front();
        next.unwrap_or(Err(GeolocationError::PositionUnavailable))
    }
}
