use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use puffin_shared::{Point, RasterSurface, StrokeStyle, SurfaceError};

use crate::dom::{context_2d, js_error_text};

/// The `<canvas>` overlay. Snapshots are PNG data URLs.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx })
    }
}

impl RasterSurface for CanvasSurface {
    type Snapshot = String;
    type Decoded = HtmlImageElement;

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn begin_path(&mut self, at: Point) {
        self.ctx.begin_path();
        self.ctx.move_to(at.x, at.y);
    }

    fn line_to(&mut self, to: Point, style: &StrokeStyle) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(&style.color.to_css());
        ctx.set_line_width(style.width);
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        let _ = ctx.set_global_composite_operation(style.composite.as_canvas_op());
        ctx.line_to(to.x, to.y);
        ctx.stroke();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn capture(&self) -> Result<String, SurfaceError> {
        self.canvas
            .to_data_url()
            .map_err(|error| SurfaceError::Capture(js_error_text(&error)))
    }

    fn repaint(&mut self, decoded: &HtmlImageElement) {
        let (width, height) = self.size();
        let _ = self.ctx.set_global_composite_operation("source-over");
        self.ctx
            .clear_rect(0.0, 0.0, width as f64, height as f64);
        if let Err(error) = self
            .ctx
            .draw_image_with_html_image_element(decoded, 0.0, 0.0)
        {
            log::warn!("Could not draw restored snapshot: {}", js_error_text(&error));
        }
    }
}
