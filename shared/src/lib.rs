mod color;
mod error;
mod export;
mod geometry;
mod history;
mod input;
#[cfg(feature = "pixel")]
mod pixel;
mod scene;
mod session;
mod surface;
mod tool;

pub use color::Rgb;
pub use error::{SceneError, SurfaceError};
pub use export::{ExportKind, Layer, COMPOSITED_FILE_NAME, EXPORT_BACKGROUND, RASTER_FILE_NAME};
pub use geometry::{Point, Rect, ViewMapping};
pub use history::{History, HISTORY_LIMIT};
pub use input::{PointerInput, TouchPhase};
#[cfg(feature = "pixel")]
pub use pixel::{export_layers, Export, PixelSurface};
pub use scene::{
    first_hit, is_fillable_tag, resolve_fill_target, VectorScene, CANDIDATE_SELECTOR,
    FILLABLE_TAGS,
};
pub use session::{DrawMode, FillOutcome, PendingRestore, Session};
pub use surface::RasterSurface;
pub use tool::{
    Composite, StrokeStyle, Tool, ToolChrome, ToolCommand, BRUSH_WIDTH, ERASER_WIDTH,
    FILL_HIGHLIGHT, HIGHLIGHT_PROPERTY, PEN_WIDTH,
};
