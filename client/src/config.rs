use serde::Deserialize;
use web_sys::{Document, Window};

use puffin_shared::{Rgb, Tool, HISTORY_LIMIT};

pub const CONFIG_ELEMENT_ID: &str = "puffin-config";

/// Page-level settings, read from an optional
/// `<script type="application/json" id="puffin-config">` block.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub canvas_id: String,
    pub svg_id: String,
    pub tool_selector: String,
    pub swatch_selector: String,
    pub initial_tool: Tool,
    pub initial_color: Rgb,
    pub history_limit: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            canvas_id: "drawCanvas".to_string(),
            svg_id: "svgImage".to_string(),
            tool_selector: ".tool-button".to_string(),
            swatch_selector: ".color-swatch".to_string(),
            initial_tool: Tool::Pen,
            initial_color: Rgb::BLACK,
            history_limit: HISTORY_LIMIT,
        }
    }
}

impl WidgetConfig {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(document: &Document) -> Self {
        let Some(text) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|element| element.text_content())
        else {
            return Self::default();
        };
        match Self::parse(&text) {
            Ok(config) => {
                log::debug!("Loaded widget config {config:?}");
                config
            }
            Err(error) => {
                log::warn!("Ignoring invalid #{CONFIG_ELEMENT_ID}: {error}");
                Self::default()
            }
        }
    }
}

pub fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1")
        || search.contains("debug=true")
        || search.contains("log=1")
        || search.contains("log=true")
}

pub fn log_level(window: &Window) -> log::Level {
    if debug_enabled(window) {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}
