///! Current-location overlay
///!
///! Asks the geolocation provider for a fix, recenters the shared map on it
///! and draws the accuracy circle. Failures have no visible effect.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use confmap_common::{GeolocationFix, LatLngBounds};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::geolocation::{GeolocationError, GeolocationProvider};
use super::scene::{AccuracyCircle, Marker, SharedMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocateMode {
    /// A single request per mount
    #[default]
    OneShot,
    /// Keep requesting until unmounted, denied, or the position is unavailable
    Continuous,
}

pub struct CurrentLocationOverlay {
    mode: LocateMode,
    poll_interval: Duration,
}

/// Live mount of the overlay. Dropping it does not stop the task; call
/// [`OverlayHandle::unmount`].
pub struct OverlayHandle {
    token: CancellationToken,
    bounds: Arc<RwLock<Option<LatLngBounds>>>,
    task: JoinHandle<()>,
}

impl OverlayHandle {
    /// Any fix arriving after this is dropped without touching the map
    pub fn unmount(&self) {
        self.token.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Bounds of the most recent applied fix
    pub async fn bounds(&self) -> Option<LatLngBounds> {
        *self.bounds.read().await
    }

    /// Wait for the locate task to finish
    pub async fn join(self) -> anyhow::Result<Option<LatLngBounds>> {
        self.task.await.context("Locate task panicked")?;
        Ok(*self.bounds.read().await)
    }
}

impl CurrentLocationOverlay {
    const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

    pub fn new(mode: LocateMode) -> Self {
        Self {
            mode,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Delay between requests in continuous mode
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Fire-and-forget: spawns the request and returns immediately
    pub fn mount(&self, map: SharedMap, provider: Arc<dyn GeolocationProvider>) -> OverlayHandle {
        let token = CancellationToken::new();
        let bounds = Arc::new(RwLock::new(None));

        let task = tokio::spawn(locate_loop(
            self.mode,
            self.poll_interval,
            map,
            provider,
            token.clone(),
            bounds.clone(),
        ));

        OverlayHandle { token, bounds, task }
    }
}

async fn locate_loop(
    mode: LocateMode,
    poll_interval: Duration,
    map: SharedMap,
    provider: Arc<dyn GeolocationProvider>,
    token: CancellationToken,
    bounds: Arc<RwLock<Option<LatLngBounds>>>,
) {
    loop {
        let result = tokio::select! {
            _ = token.cancelled() => break,
            result = provider.request_location() => result,
        };

        match result {
            Ok(fix) => {
                if !apply_fix(&map, &bounds, &token, fix).await {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!("Location request failed (code {}): {}", e.code(), e);
                if mode == LocateMode::OneShot || ends_tracking(e) {
                    break;
                }
            }
        }

        if mode == LocateMode::OneShot {
            break;
        }

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(poll_interval) => {}
        }
    }
}

/// Errors after which continuous tracking cannot produce another fix
fn ends_tracking(error: GeolocationError) -> bool {
    matches!(
        error,
        GeolocationError::PermissionDenied | GeolocationError::PositionUnavailable
    )
}

/// Returns false when the overlay was unmounted before the fix landed
async fn apply_fix(
    map: &SharedMap,
    bounds: &RwLock<Option<LatLngBounds>>,
    token: &CancellationToken,
    fix: GeolocationFix,
) -> bool {
    let mut scene = map.write().await;
    if token.is_cancelled() {
        tracing::debug!("Discarding location fix for unmounted overlay");
        return false;
    }

    scene.viewport.recenter(fix.latlng);
    scene.accuracy_circle = Some(AccuracyCircle {
        center: fix.latlng,
        radius: fix.accuracy,
    });
    scene.location_marker = Some(Marker::pin(
        fix.latlng,
        format!("You are within {} meters from this point", fix.accuracy),
    ));
    drop(scene);

    *bounds.write().await = Some(fix.bounds());
    tracing::debug!("Recentered on current location {} (±{} m)", fix.latlng, fix.accuracy);
    true
}
