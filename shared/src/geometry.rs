use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn normalize(self) -> Option<Point> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return None;
        }
        Some(self)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Parses an SVG `viewBox` attribute (`min-x min-y width height`).
    pub fn parse_view_box(value: &str) -> Option<Rect> {
        let mut parts = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().ok().filter(|n| n.is_finite()));
        let x = parts.next()??;
        let y = parts.next()??;
        let width = parts.next()??;
        let height = parts.next()??;
        if parts.next().is_some() {
            return None;
        }
        let rect = Rect::new(x, y, width, height);
        rect.has_area().then_some(rect)
    }

    /// View size from the root's `width`/`height` attributes. Only unitless
    /// and `px` lengths are understood.
    pub fn from_svg_size(width: &str, height: &str) -> Option<Rect> {
        let rect = Rect::new(0.0, 0.0, parse_px(width)?, parse_px(height)?);
        rect.has_area().then_some(rect)
    }
}

fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim_end();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Maps page coordinates onto the coordinate space of an embedded vector
/// document, given where its container is on screen and its declared view box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewMapping {
    pub container: Rect,
    pub view_box: Rect,
}

impl ViewMapping {
    /// Builds the mapping from the root element's attributes. Without a
    /// usable `viewBox` the root's `width`/`height` are used, and without
    /// those the document is taken to be drawn at one unit per pixel.
    pub fn from_attributes(
        container: Rect,
        view_box: Option<&str>,
        width: Option<&str>,
        height: Option<&str>,
    ) -> Self {
        let view_box = view_box
            .and_then(Rect::parse_view_box)
            .or_else(|| Rect::from_svg_size(width?, height?))
            .unwrap_or(Rect::new(0.0, 0.0, container.width, container.height));
        Self {
            container,
            view_box,
        }
    }

    pub fn to_document(&self, screen: Point) -> Option<Point> {
        if !self.container.has_area() {
            return None;
        }
        let local_x = screen.x - self.container.x;
        let local_y = screen.y - self.container.y;
        Point::new(
            self.view_box.x + local_x / self.container.width * self.view_box.width,
            self.view_box.y + local_y / self.container.height * self.view_box.height,
        )
        .normalize()
    }
}
