use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use confmap_common::ConferenceRecord;
use tokio::fs;
use tracing::{debug, info};

use crate::map::{MapScene, MarkerIcon};

const LOCATION_SVG: &str = include_str!("../../resources/location.svg");

const INDEX_FILE: &str = "index.html";
const RECORDS_FILE: &str = "conferences.json";
const SCENE_FILE: &str = "scene.json";

/// Writes the generated site into one output directory
pub struct SiteWriter {
    output_dir: PathBuf,
}

impl SiteWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn write_file(&self, relative: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.output_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {:?}", path))?;
        debug!("Wrote {:?} ({} bytes)", path, content.len());
        Ok(path)
    }

    /// Write the page, the record list, the scene and the marker asset.
    /// Returns the written paths.
    pub async fn write(
        &self,
        index_html: &str,
        records: &[ConferenceRecord],
        scene: Option<&MapScene>,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        written.push(self.write_file(INDEX_FILE, index_html.as_bytes()).await?);

        let records_json = serde_json::to_string_pretty(records).context("Failed to serialize conference records")?;
        written.push(self.write_file(RECORDS_FILE, records_json.as_bytes()).await?);

        if let Some(scene) = scene {
            let scene_json = serde_json::to_string_pretty(scene).context("Failed to serialize map scene")?;
            written.push(self.write_file(SCENE_FILE, scene_json.as_bytes()).await?);
            written.push(
                self.write_file(MarkerIcon::LOCATION_SVG, LOCATION_SVG.as_bytes())
                    .await?,
            );
        }

        info!("Wrote {} files to {:?}", written.len(), self.output_dir);
        Ok(written)
    }
}
