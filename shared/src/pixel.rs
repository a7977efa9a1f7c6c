use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::{SceneError, SurfaceError};
use crate::export::{ExportKind, Layer};
use crate::geometry::Point;
use crate::surface::RasterSurface;
use crate::tool::{Composite, StrokeStyle};

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// In-memory RGBA raster layer. Strokes are round-capped capsules without
/// anti-aliasing; snapshots are PNG bytes.
#[derive(Clone, Debug)]
pub struct PixelSurface {
    image: RgbaImage,
    pen: Option<Point>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            pen: None,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|pixel| pixel.0)
    }

    pub fn decode(snapshot: &[u8]) -> Result<RgbaImage, SurfaceError> {
        if snapshot.is_empty() {
            return Ok(RgbaImage::new(0, 0));
        }
        image::load_from_memory_with_format(snapshot, ImageFormat::Png)
            .map(|decoded| decoded.to_rgba8())
            .map_err(|error| SurfaceError::Decode(error.to_string()))
    }

    /// Composes this surface with an optional rendering of the vector
    /// document into a PNG.
    pub fn export(&self, vector: Result<RgbaImage, SceneError>) -> Result<Export, SurfaceError> {
        export_layers(vector, &self.image)
    }

    fn stamp_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return;
        }
        let radius = style.width / 2.0;
        let min_x = (from.x.min(to.x) - radius).floor().max(0.0) as u32;
        let min_y = (from.y.min(to.y) - radius).floor().max(0.0) as u32;
        let max_x = (from.x.max(to.x) + radius).ceil().min(width as f64 - 1.0);
        let max_y = (from.y.max(to.y) + radius).ceil().min(height as f64 - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }
        let paint = match style.composite {
            Composite::SourceOver => Rgba(style.color.to_rgba()),
            Composite::DestinationOut => CLEAR,
        };
        for y in min_y..=max_y as u32 {
            for x in min_x..=max_x as u32 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if distance_to_segment(center, from, to) <= radius {
                    self.image.put_pixel(x, y, paint);
                }
            }
        }
    }
}

impl RasterSurface for PixelSurface {
    type Snapshot = Vec<u8>;
    type Decoded = RgbaImage;

    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
        self.pen = None;
    }

    fn begin_path(&mut self, at: Point) {
        self.pen = Some(at);
    }

    fn line_to(&mut self, to: Point, style: &StrokeStyle) {
        let from = self.pen.unwrap_or(to);
        self.stamp_segment(from, to, style);
        self.pen = Some(to);
    }

    fn close_path(&mut self) {
        self.pen = None;
    }

    fn capture(&self) -> Result<Vec<u8>, SurfaceError> {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }
        encode_png(&self.image)
    }

    fn repaint(&mut self, decoded: &RgbaImage) {
        for pixel in self.image.pixels_mut() {
            *pixel = CLEAR;
        }
        imageops::replace(&mut self.image, decoded, 0, 0);
    }
}

/// A finished PNG export.
#[derive(Clone, Debug)]
pub struct Export {
    pub kind: ExportKind,
    pub png: Vec<u8>,
}

impl Export {
    pub fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }
}

/// Stacks the export layers over a canvas the size of `raster`. A missing
/// vector rendering degrades the export to the raster layer alone.
pub fn export_layers(
    vector: Result<RgbaImage, SceneError>,
    raster: &RgbaImage,
) -> Result<Export, SurfaceError> {
    let vector = match vector {
        Ok(vector) => Some(vector),
        Err(error) => {
            log::warn!("Exporting drawing only: {error}");
            None
        }
    };
    let kind = ExportKind::for_document(vector.is_some());
    let (width, height) = raster.dimensions();
    let mut canvas = RgbaImage::new(width, height);
    for layer in kind.layers() {
        match layer {
            Layer::Background(color) => {
                for pixel in canvas.pixels_mut() {
                    *pixel = Rgba(color.to_rgba());
                }
            }
            Layer::Vector => {
                if let Some(vector) = &vector {
                    if width > 0 && height > 0 {
                        let scaled = imageops::resize(vector, width, height, FilterType::Triangle);
                        imageops::overlay(&mut canvas, &scaled, 0, 0);
                    }
                }
            }
            Layer::Raster => imageops::overlay(&mut canvas, raster, 0, 0),
        }
    }
    log::info!("Exported {}x{} image as {}", width, height, kind.file_name());
    Ok(Export {
        kind,
        png: encode_png(&canvas)?,
    })
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, SurfaceError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|error| SurfaceError::Encode(error.to_string()))?;
    Ok(bytes)
}

fn distance_to_segment(point: Point, from: Point, to: Point) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq <= f64::EPSILON {
        0.0
    } else {
        (((point.x - from.x) * dx + (point.y - from.y) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let nearest_x = from.x + t * dx;
    let nearest_y = from.y + t * dy;
    ((point.x - nearest_x).powi(2) + (point.y - nearest_y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::tool::Tool;

    fn pen(color: Rgb) -> StrokeStyle {
        Tool::Pen.stroke_style(color).unwrap()
    }

    #[test]
    fn test_line_paints_along_segment() {
        let mut surface = PixelSurface::new(40, 40);
        surface.begin_path(Point::new(5.0, 20.0));
        surface.line_to(Point::new(35.0, 20.0), &pen(Rgb::new(200, 0, 0)));
        assert_eq!(surface.pixel(20, 20), Some([200, 0, 0, 255]));
        assert_eq!(surface.pixel(20, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_round_caps_extend_past_endpoints() {
        let mut surface = PixelSurface::new(40, 40);
        surface.begin_path(Point::new(20.0, 20.0));
        let brush = Tool::Brush.stroke_style(Rgb::BLACK).unwrap();
        surface.line_to(Point::new(20.0, 20.0), &brush);
        assert_eq!(surface.pixel(24, 20).map(|p| p[3]), Some(255));
        assert_eq!(surface.pixel(30, 20).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_snapshot_survives_png_roundtrip() {
        let mut surface = PixelSurface::new(16, 16);
        surface.begin_path(Point::new(2.0, 2.0));
        surface.line_to(Point::new(12.0, 12.0), &pen(Rgb::new(0, 90, 0)));
        let snapshot = surface.capture().unwrap();
        let decoded = PixelSurface::decode(&snapshot).unwrap();

        let mut other = PixelSurface::new(16, 16);
        other.repaint(&decoded);
        assert_eq!(other.image(), surface.image());
    }

    #[test]
    fn test_empty_surface_snapshots() {
        let surface = PixelSurface::new(0, 0);
        let snapshot = surface.capture().unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(PixelSurface::decode(&snapshot).unwrap().dimensions(), (0, 0));
    }

    #[test]
    fn test_composited_export_stacks_layers() {
        let mut surface = PixelSurface::new(10, 10);
        surface.begin_path(Point::new(0.0, 5.0));
        surface.line_to(Point::new(3.0, 5.0), &pen(Rgb::new(0, 0, 255)));
        let vector = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));

        let export = surface.export(Ok(vector)).unwrap();
        assert_eq!(export.file_name(), "puffin_coloring.png");
        let image = PixelSurface::decode(&export.png).unwrap();
        assert_eq!(image.dimensions(), (10, 10));
        assert_eq!(image.get_pixel(1, 5).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(8, 8).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_raster_only_export_without_vector() {
        let surface = PixelSurface::new(8, 8);
        let export = surface.export(Err(SceneError::Inaccessible)).unwrap();
        assert_eq!(export.kind, ExportKind::RasterOnly);
        assert_eq!(export.file_name(), "puffin_drawing.png");
        let image = PixelSurface::decode(&export.png).unwrap();
        assert_eq!(image.get_pixel(4, 4).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_composited_background_is_white() {
        let surface = PixelSurface::new(4, 4);
        let vector = RgbaImage::new(4, 4);
        let export = surface.export(Ok(vector)).unwrap();
        let image = PixelSurface::decode(&export.png).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
