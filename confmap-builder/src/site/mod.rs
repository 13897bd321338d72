///! Static site generation
///!
///! CMS records -> map scene -> index page + data files.

pub mod page;
pub mod writer;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use confmap_common::{ConferenceRecord, GeolocationFix};

use crate::cms::{normalize_records, CmsClient};
use crate::config::BuilderConfig;
use crate::map::{CurrentLocationOverlay, FixedLocation, LocateMode, MapRenderer, MapScene, RenderSurface};

pub use page::{escape_html, LocateSettings, PageRenderer};
pub use writer::SiteWriter;

/// Result of one build
#[derive(Debug)]
pub struct BuildReport {
    pub records: usize,
    pub markers: usize,
    pub files: Vec<PathBuf>,
}

pub struct SiteBuilder {
    config: BuilderConfig,
    surface: RenderSurface,
}

impl SiteBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        let surface = RenderSurface::from_headless_flag(config.map.headless);
        Self { config, surface }
    }

    /// Fetch from the CMS, then build
    pub async fn build(&self) -> Result<BuildReport> {
        let client = CmsClient::new(&self.config.cms)?;
        let raw = client
            .fetch_collection(&self.config.cms.collection_key)
            .await
            .context("Failed to fetch conferences from the CMS")?;

        let records = normalize_records(raw, self.config.cms.date_style, Utc::now());
        self.build_from_records(&records).await
    }

    pub async fn build_from_records(&self, records: &[ConferenceRecord]) -> Result<BuildReport> {
        let renderer = MapRenderer::new(self.surface).with_zoom(self.config.map.zoom);

        let scene = match renderer.render(records) {
            Some(scene) => Some(self.apply_fixed_location(scene).await?),
            None => None,
        };

        let locate = LocateSettings {
            enable: self.config.locate.enable,
            mode: self.config.locate.mode,
        };
        let html = PageRenderer::new(&self.config.site.title).render_index(scene.as_ref(), locate, Utc::now())?;

        let files = SiteWriter::new(&self.config.site.output_dir)
            .write(&html, records, scene.as_ref())
            .await?;

        Ok(BuildReport {
            records: records.len(),
            markers: scene.as_ref().map_or(0, |s| s.markers.len()),
            files,
        })
    }

    /// Run the overlay once against a configured location so the page opens there
    async fn apply_fixed_location(&self, scene: MapScene) -> Result<MapScene> {
        let Some(fixed) = self.config.locate.fixed.filter(|_| self.config.locate.enable) else {
            return Ok(scene);
        };

        let map = scene.into_shared();
        let provider = Arc::new(FixedLocation(GeolocationFix::new(fixed.lat, fixed.lng, fixed.accuracy)));
        let bounds = CurrentLocationOverlay::new(LocateMode::OneShot)
            .mount(map.clone(), provider)
            .join()
            .await?;
        tracing::info!("Applied fixed location, bounds {:?}", bounds);

        let scene = map.read().await.clone();
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedFix;
    use confmap_common::LatLng;
    use tempfile::TempDir;

    fn config(output_dir: &std::path::Path) -> BuilderConfig {
        let mut config = BuilderConfig::default();
        config.site.output_dir = output_dir.to_string_lossy().to_string();
        config
    }

    fn records() -> Vec<ConferenceRecord> {
        vec![
            ConferenceRecord {
                title: "React Summit".to_string(),
                location: "Amsterdam".to_string(),
                date: "2026-06-13".to_string(),
                lat: 52.3676,
                lng: 4.9041,
                conference_url: "https://reactsummit.com".to_string(),
            },
            ConferenceRecord {
                title: "Lost Conf".to_string(),
                location: "Unknown".to_string(),
                date: "".to_string(),
                lat: f64::NAN,
                lng: f64::NAN,
                conference_url: "".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_build_from_records() {
        let temp_dir = TempDir::new().unwrap();
        let report = SiteBuilder::new(config(temp_dir.path()))
            .build_from_records(&records())
            .await
            .unwrap();

        assert_eq!(report.records, 2);
        assert_eq!(report.markers, 1);
        let html = std::fs::read_to_string(temp_dir.path().join("index.html")).unwrap();
        assert!(html.contains("React Summit"));
    }

    #[tokio::test]
    async fn test_headless_build_writes_page_without_map() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config(temp_dir.path());
        config.map.headless = true;

        let report = SiteBuilder::new(config).build_from_records(&records()).await.unwrap();
        assert_eq!(report.markers, 0);
        assert_eq!(report.files.len(), 2);
    }

    #[tokio::test]
    async fn test_fixed_location_recenters_scene() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config(temp_dir.path());
        config.locate.fixed = Some(FixedFix { lat: 10.0, lng: 20.0, accuracy: 50.0 });

        SiteBuilder::new(config).build_from_records(&records()).await.unwrap();

        let scene: MapScene =
            serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("scene.json")).unwrap()).unwrap();
        assert_eq!(scene.viewport.center, LatLng::new(10.0, 20.0));
        assert_eq!(scene.accuracy_circle.map(|c| c.radius), Some(50.0));
    }
}
