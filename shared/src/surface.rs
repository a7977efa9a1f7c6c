use crate::error::SurfaceError;
use crate::geometry::Point;
use crate::tool::StrokeStyle;

/// The pixel layer strokes are painted onto.
///
/// Snapshots are whatever serialized form the backend can capture cheaply.
/// Turning a snapshot back into pixels may be asynchronous, so restoring is
/// split: the caller decodes a snapshot into `Decoded` on its own schedule and
/// then hands it to [`RasterSurface::repaint`].
pub trait RasterSurface {
    type Snapshot: Clone;
    type Decoded;

    fn size(&self) -> (u32, u32);

    /// Changes the pixel dimensions. Contents are cleared.
    fn resize(&mut self, width: u32, height: u32);

    fn begin_path(&mut self, at: Point);

    /// Extends the current path to `to` and strokes it.
    fn line_to(&mut self, to: Point, style: &StrokeStyle);

    fn close_path(&mut self);

    fn capture(&self) -> Result<Self::Snapshot, SurfaceError>;

    /// Clears the surface and draws `decoded` at the origin.
    fn repaint(&mut self, decoded: &Self::Decoded);
}
