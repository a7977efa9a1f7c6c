use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlObjectElement, Node};

use puffin_shared::{
    Point, Rect, Rgb, SceneError, VectorScene, ViewMapping, CANDIDATE_SELECTOR,
};

use crate::dom::js_error_text;

/// The host page plus the SVG document loaded into its `<object>`.
///
/// Elements of the embedded document belong to another browsing context, so
/// they are reached through `Reflect` and unchecked casts rather than
/// `instanceof`-based `dyn_into`.
pub struct DomScene {
    document: Document,
    container: HtmlObjectElement,
}

impl DomScene {
    pub fn new(document: Document, container: HtmlObjectElement) -> Self {
        Self {
            document,
            container,
        }
    }

    fn vector_document(&self) -> Result<Document, SceneError> {
        self.container
            .content_document()
            .ok_or(SceneError::Inaccessible)
    }
}

impl VectorScene for DomScene {
    type Shape = Element;

    fn element_at(&self, screen: Point) -> Option<Element> {
        self.document
            .element_from_point(screen.x as f32, screen.y as f32)
    }

    fn tag_name(&self, shape: &Element) -> String {
        shape.tag_name()
    }

    fn parent(&self, shape: &Element) -> Option<Element> {
        shape.parent_element()
    }

    fn mapping(&self) -> Result<ViewMapping, SceneError> {
        let root = self
            .vector_document()?
            .document_element()
            .ok_or(SceneError::Inaccessible)?;
        let rect = self.container.get_bounding_client_rect();
        Ok(ViewMapping::from_attributes(
            Rect::new(rect.left(), rect.top(), rect.width(), rect.height()),
            root.get_attribute("viewBox").as_deref(),
            root.get_attribute("width").as_deref(),
            root.get_attribute("height").as_deref(),
        ))
    }

    fn candidates(&self) -> Result<Vec<Element>, SceneError> {
        let nodes = self
            .vector_document()?
            .query_selector_all(CANDIDATE_SELECTOR)
            .map_err(|error| SceneError::Backend(js_error_text(&error)))?;
        Ok((0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter(|node| node.node_type() == Node::ELEMENT_NODE)
            .map(|node| node.unchecked_into::<Element>())
            .collect())
    }

    fn bounding_box(&self, shape: &Element) -> Result<Rect, SceneError> {
        let unavailable = || SceneError::NoBoundingBox(self.describe(shape));
        let get_b_box = Reflect::get(shape.as_ref(), &JsValue::from_str("getBBox"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or_else(unavailable)?;
        let bbox = get_b_box
            .call0(shape.as_ref())
            .map_err(|_| unavailable())?;
        let field = |name: &str| {
            Reflect::get(&bbox, &JsValue::from_str(name))
                .ok()
                .and_then(|value| value.as_f64())
                .ok_or_else(unavailable)
        };
        Ok(Rect::new(
            field("x")?,
            field("y")?,
            field("width")?,
            field("height")?,
        ))
    }

    fn set_fill(&mut self, shape: &Element, color: Rgb) -> Result<(), SceneError> {
        shape
            .set_attribute("fill", &color.to_css())
            .map_err(|error| SceneError::Backend(js_error_text(&error)))
    }

    fn describe(&self, shape: &Element) -> String {
        let id = shape.id();
        if id.is_empty() {
            format!("{} (no-id)", shape.tag_name())
        } else {
            format!("{}#{id}", shape.tag_name())
        }
    }
}
