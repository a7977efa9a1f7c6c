use crate::color::Rgb;

pub const COMPOSITED_FILE_NAME: &str = "puffin_coloring.png";
pub const RASTER_FILE_NAME: &str = "puffin_drawing.png";
pub const EXPORT_BACKGROUND: Rgb = Rgb::WHITE;

/// Which export path produced an image. The file name tells them apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    /// Background, vector document and raster strokes.
    Composited,
    /// Raster strokes only, used when the vector document cannot be read.
    RasterOnly,
}

/// One layer of an exported image, bottom first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Background(Rgb),
    /// Vector document scaled to the raster surface size.
    Vector,
    Raster,
}

impl ExportKind {
    pub fn for_document(accessible: bool) -> Self {
        if accessible {
            ExportKind::Composited
        } else {
            ExportKind::RasterOnly
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ExportKind::Composited => COMPOSITED_FILE_NAME,
            ExportKind::RasterOnly => RASTER_FILE_NAME,
        }
    }

    pub fn layers(self) -> &'static [Layer] {
        match self {
            ExportKind::Composited => &[
                Layer::Background(EXPORT_BACKGROUND),
                Layer::Vector,
                Layer::Raster,
            ],
            ExportKind::RasterOnly => &[Layer::Raster],
        }
    }
}
