///! Index page rendering
///!
///! The scene is embedded as JSON and replayed by a small Leaflet bootstrap
///! script; all CMS text reaches the DOM through `textContent`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::map::{LocateMode, MapScene};

const INDEX_TEMPLATE: &str = include_str!("../../resources/index_template.html");
const MAP_BOOTSTRAP_JS: &str = include_str!("../../resources/map_bootstrap.js");
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Browser-side locate behaviour
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LocateSettings {
    pub enable: bool,
    pub mode: LocateMode,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON safe to place inside a `<script>` element
pub fn embed_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize JSON for embedding")?;
    Ok(json.replace('<', "\\u003c"))
}

pub struct PageRenderer {
    title: String,
}

impl PageRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    pub fn render_index(
        &self,
        scene: Option<&MapScene>,
        locate: LocateSettings,
        built_at: DateTime<Utc>,
    ) -> Result<String> {
        let map_block = match scene {
            Some(scene) => self.map_block(scene, locate)?,
            None => String::new(),
        };

        Ok(INDEX_TEMPLATE
            .replace("{{VERSION}}", env!("CARGO_PKG_VERSION"))
            .replace("{{BUILT_AT}}", &built_at.format("%Y-%m-%d %H:%M UTC").to_string())
            .replace("{{TITLE}}", &escape_html(&self.title))
            .replace("{{MAP}}", &map_block))
    }

    fn map_block(&self, scene: &MapScene, locate: LocateSettings) -> Result<String> {
        let mut block = String::new();

        block.push_str(&format!(
            r#"    <div id="map" style="height: {}; width: {};"></div>"#,
            escape_html(&scene.height),
            escape_html(&scene.width)
        ));
        block.push('\n');
        block.push_str(&format!(
            r#"    <script id="map-scene" type="application/json">{}</script>"#,
            embed_json(scene)?
        ));
        block.push('\n');
        block.push_str(&format!(
            r#"    <script id="map-locate" type="application/json">{}</script>"#,
            embed_json(&locate)?
        ));
        block.push('\n');
        block.push_str(&format!(r#"    <script src="{}" crossorigin=""></script>"#, LEAFLET_JS));
        block.push('\n');
        block.push_str("    <script>\n");
        block.push_str(MAP_BOOTSTRAP_JS);
        block.push_str("    </script>");

        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapRenderer, RenderSurface};
    use chrono::TimeZone;
    use confmap_common::ConferenceRecord;

    fn built_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    fn locate() -> LocateSettings {
        LocateSettings {
            enable: true,
            mode: LocateMode::Continuous,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"R&D" 'conf'</b>"#),
            "&lt;b&gt;&quot;R&amp;D&quot; &#39;conf&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_embed_json_cannot_close_script() {
        let embedded = embed_json(&"</script><script>alert(1)").unwrap();
        assert!(!embedded.contains("</script>"));
        let back: String = serde_json::from_str(&embedded).unwrap();
        assert_eq!(back, "</script><script>alert(1)");
    }

    #[test]
    fn test_index_contains_scene() {
        let records = vec![ConferenceRecord {
            title: "React <Day>".to_string(),
            location: "Berlin".to_string(),
            date: "in 3 months".to_string(),
            lat: 52.52,
            lng: 13.405,
            conference_url: "https://reactday.berlin".to_string(),
        }];
        let scene = MapRenderer::new(RenderSurface::Available).render(&records).unwrap();
        let html = PageRenderer::new("React Conferences")
            .render_index(Some(&scene), locate(), built_at())
            .unwrap();

        assert!(html.contains("<title>React Conferences</title>"));
        assert!(html.contains(r#"<div id="map" style="height: 800px; width: 100%;">"#));
        assert!(html.contains(r#"React \u003cDay>"#));
        assert!(!html.contains("React <Day>"));
        assert!(html.contains("OpenStreetMap"));
        assert!(html.contains(r#""mode":"continuous""#));
        assert!(html.contains("Built 2026-10-16 09:30 UTC"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_browser_locate_keeps_zoom() {
        assert!(MAP_BOOTSTRAP_JS.contains("setView: false"));
        assert!(!MAP_BOOTSTRAP_JS.contains("setView: true"));
        assert!(MAP_BOOTSTRAP_JS.contains("map.setView(e.latlng, map.getZoom())"));
    }

    #[test]
    fn test_headless_page_has_no_map() {
        let html = PageRenderer::new("Tom & Jerry Conf")
            .render_index(None, locate(), built_at())
            .unwrap();

        assert!(html.contains("Tom &amp; Jerry Conf"));
        assert!(!html.contains(r#"id="map""#));
        assert!(!html.contains("leaflet.js"));
    }
}
