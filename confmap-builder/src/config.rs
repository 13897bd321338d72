use std::sync::OnceLock;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cms::DateStyle;
use crate::map::LocateMode;

pub const API_KEY_ENV: &str = "BUTTER_CMS_API_KEY";
pub const PREVIEW_ENV: &str = "BUTTER_CMS_PREVIEW";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Overridden by `BUTTER_CMS_API_KEY` when set
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_collection_key")]
    pub collection_key: String,

    /// Include draft content. Overridden by `BUTTER_CMS_PREVIEW` when set
    #[serde(default = "default_preview")]
    pub preview: bool,

    #[serde(default)]
    pub date_style: DateStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Build without a rendering surface; the page gets no map
    #[serde(default)]
    pub headless: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FixedFix {
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocateConfig {
    #[serde(default = "default_locate_enable")]
    pub enable: bool,

    #[serde(default)]
    pub mode: LocateMode,

    /// Bake a known location into the generated scene
    #[serde(default)]
    pub fixed: Option<FixedFix>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub cms: CmsConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub locate: LocateConfig,

    #[serde(default)]
    pub site: SiteConfig,
}

fn default_api_base() -> String {
    "https://api.buttercms.com".to_string()
}

fn default_collection_key() -> String {
    "conference".to_string()
}

fn default_preview() -> bool {
    true
}

fn default_zoom() -> u8 {
    13
}

fn default_accuracy() -> f64 {
    50.0
}

fn default_locate_enable() -> bool {
    true
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_title() -> String {
    "React Conferences".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
            collection_key: default_collection_key(),
            preview: default_preview(),
            date_style: DateStyle::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            headless: false,
        }
    }
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            enable: default_locate_enable(),
            mode: LocateMode::default(),
            fixed: None,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            title: default_title(),
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            cms: CmsConfig::default(),
            map: MapConfig::default(),
            locate: LocateConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

/// Preview stays on unless the variable is exactly "false" or "0"
pub fn preview_from_env(value: Option<&str>) -> bool {
    !matches!(value, Some("false") | Some("0"))
}

impl BuilderConfig {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        Self::parse(&content)
    }

    /// Apply `BUTTER_CMS_API_KEY` / `BUTTER_CMS_PREVIEW`
    pub fn apply_env_overrides(&mut self, api_key: Option<String>, preview: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.cms.api_key = key;
        }
        if preview.is_some() {
            self.cms.preview = preview_from_env(preview.as_deref());
        }
    }
}

pub static CONFIG: OnceLock<BuilderConfig> = OnceLock::new();

/// Load `config.toml` (or defaults when absent), apply the environment and
/// install it as the process-wide config.
pub fn read_config(path: &str) -> anyhow::Result<&'static BuilderConfig> {
    let mut config = if std::path::Path::new(path).exists() {
        BuilderConfig::from_file(path)?
    } else {
        BuilderConfig::default()
    };

    config.apply_env_overrides(
        std::env::var(API_KEY_ENV).ok(),
        std::env::var(PREVIEW_ENV).ok(),
    );

    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_from_env() {
        assert!(preview_from_env(None));
        assert!(preview_from_env(Some("1")));
        assert!(preview_from_env(Some("true")));
        assert!(preview_from_env(Some("")));
        assert!(!preview_from_env(Some("false")));
        assert!(!preview_from_env(Some("0")));
    }

    #[test]
    fn test_parse_defaults() {
        let config = BuilderConfig::parse("").unwrap();
        assert_eq!(config.cms.collection_key, "conference");
        assert!(config.cms.preview);
        assert_eq!(config.map.zoom, 13);
        assert_eq!(config.locate.mode, LocateMode::OneShot);
        assert_eq!(config.site.output_dir, "public");
    }

    #[test]
    fn test_parse_full() {
        let config = BuilderConfig::parse(
            r#"
            log_level = "debug"

            [cms]
            api_key = "from-file"
            preview = false
            date_style = "relative"

            [map]
            zoom = 4

            [locate]
            mode = "continuous"
            fixed = { lat = 10.0, lng = 20.0 }
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.cms.date_style, DateStyle::Relative);
        assert!(!config.cms.preview);
        assert_eq!(config.map.zoom, 4);
        assert_eq!(config.locate.mode, LocateMode::Continuous);
        let fixed = config.locate.fixed.unwrap();
        assert_eq!(fixed.accuracy, 50.0);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BuilderConfig::default();
        config.cms.api_key = "from-file".to_string();

        config.apply_env_overrides(Some(String::new()), None);
        assert_eq!(config.cms.api_key, "from-file");
        assert!(config.cms.preview);

        config.apply_env_overrides(Some("from-env".to_string()), Some("0".to_string()));
        assert_eq!(config.cms.api_key, "from-env");
        assert!(!config.cms.preview);
    }
}
