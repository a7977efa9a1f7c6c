use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlAnchorElement, HtmlCanvasElement,
    HtmlImageElement, HtmlObjectElement, TouchEvent,
};

use puffin_shared::Point;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        log::warn!("Invalid selector {selector:?}");
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("Invalid canvas context"))
}

pub fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
    let _ = canvas.style().set_property("cursor", cursor);
}

/// Rendered size of the vector container, in CSS pixels.
pub fn container_size(svg_object: &HtmlObjectElement) -> (u32, u32) {
    (
        svg_object.client_width().max(0) as u32,
        svg_object.client_height().max(0) as u32,
    )
}

pub fn event_to_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    Point::new(
        client_x as f64 - rect.left(),
        client_y as f64 - rect.top(),
    )
    .normalize()
}

pub fn first_touch(event: &TouchEvent) -> Option<(i32, i32)> {
    let touch = event.touches().get(0)?;
    Some((touch.client_x(), touch.client_y()))
}

/// Loads `src` into an image element and waits until it can be drawn.
pub async fn load_image(src: &str) -> Result<HtmlImageElement, JsValue> {
    let image = HtmlImageElement::new()?;
    image.set_src(src);
    JsFuture::from(image.decode()).await?;
    Ok(image)
}

pub fn download(document: &Document, href: &str, file_name: &str) -> Result<(), JsValue> {
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(href);
    anchor.set_download(file_name);
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("Missing document body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Ok(())
}

pub fn js_error_text(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}
