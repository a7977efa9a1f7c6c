use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use puffin_shared::{Rgb, Tool, ToolChrome, ToolCommand, HIGHLIGHT_PROPERTY};

use crate::config::WidgetConfig;
use crate::dom::query_all;

pub enum ToolbarAction {
    Command(ToolCommand),
    Color(Rgb),
}

/// Walks up from the event target to the first element carrying a
/// `data-tool` or `data-color` attribute.
pub fn toolbar_action_from_event(event: &Event) -> Option<ToolbarAction> {
    let mut current = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    while let Some(element) = current {
        if let Some(tool) = element.get_attribute("data-tool") {
            return match tool.parse::<ToolCommand>() {
                Ok(command) => Some(ToolbarAction::Command(command)),
                Err(error) => {
                    log::warn!("{error}");
                    None
                }
            };
        }
        if let Some(color) = element.get_attribute("data-color") {
            return Some(ToolbarAction::Color(Rgb::parse_or_black(&color)));
        }
        current = element.parent_element();
    }
    None
}

/// Clears the highlight from every tool control, then marks the one for
/// `tool`.
pub fn mark_active_tool(document: &Document, selector: &str, tool: Tool, chrome: ToolChrome) {
    for element in query_all(document, selector) {
        let _ = element.class_list().remove_1("active");
        if let Ok(button) = element.clone().dyn_into::<HtmlElement>() {
            let _ = button.style().remove_property(HIGHLIGHT_PROPERTY);
        }
        if element.get_attribute("data-tool").as_deref() != Some(tool.id()) {
            continue;
        }
        let _ = element.class_list().add_1("active");
        if let (Some(highlight), Ok(button)) = (chrome.highlight, element.dyn_into::<HtmlElement>())
        {
            let _ = button.style().set_property(HIGHLIGHT_PROPERTY, highlight);
        }
    }
}

/// Whether the event started on a tool control or a color swatch.
pub fn is_control_event(event: &Event, config: &WidgetConfig) -> bool {
    let Some(element) = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
    else {
        return false;
    };
    [&config.tool_selector, &config.swatch_selector]
        .iter()
        .any(|selector| matches!(element.closest(selector), Ok(Some(_))))
}
