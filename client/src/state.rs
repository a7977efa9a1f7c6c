use web_sys::{Document, HtmlCanvasElement, HtmlObjectElement};

use puffin_shared::Session;

use crate::config::WidgetConfig;
use crate::surface::CanvasSurface;

pub struct State {
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    /// `<object>` hosting the vector document.
    pub svg_object: HtmlObjectElement,
    pub session: Session<CanvasSurface>,
    pub config: WidgetConfig,
}
