use crate::color::Rgb;
use crate::error::SurfaceError;
use crate::geometry::Point;
use crate::history::History;
use crate::input::PointerInput;
use crate::scene::{resolve_fill_target, VectorScene};
use crate::surface::RasterSurface;
use crate::tool::{Tool, ToolChrome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    Idle,
    Drawing,
}

/// An undo whose snapshot still has to be decoded before it can be painted.
/// Only the most recently issued request is honored by
/// [`Session::finish_restore`].
#[derive(Clone, Debug)]
pub struct PendingRestore<T> {
    pub seq: u64,
    pub snapshot: T,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FillOutcome {
    Filled(String),
    Missed,
    /// Smart fill is not the active tool.
    Inactive,
    Failed(String),
}

/// State of one coloring surface: the raster layer, its undo history and the
/// active tool and color.
pub struct Session<S: RasterSurface> {
    surface: S,
    history: History<S::Snapshot>,
    tool: Tool,
    color: Rgb,
    mode: DrawMode,
    restore_seq: u64,
}

impl<S: RasterSurface> Session<S> {
    pub fn new(surface: S, tool: Tool, color: Rgb) -> Result<Self, SurfaceError> {
        Self::with_history(surface, tool, color, History::new())
    }

    pub fn with_history(
        surface: S,
        tool: Tool,
        color: Rgb,
        mut history: History<S::Snapshot>,
    ) -> Result<Self, SurfaceError> {
        history.reset(surface.capture()?);
        Ok(Self {
            surface,
            history,
            tool,
            color,
            mode: DrawMode::Idle,
            restore_seq: 0,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn history(&self) -> &History<S::Snapshot> {
        &self.history
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn select_tool(&mut self, tool: Tool) -> ToolChrome {
        if let Err(error) = self.pointer_up() {
            log::warn!("Could not record stroke interrupted by tool change: {error}");
        }
        log::debug!("Tool {} -> {}", self.tool.id(), tool.id());
        self.tool = tool;
        tool.chrome()
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Resizes the raster layer, which clears it, and starts a fresh history
    /// from the blank surface. History is left empty when the blank surface
    /// cannot be captured.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        log::debug!(
            "Resizing surface from {:?} to {width}x{height}",
            self.surface.size()
        );
        self.surface.resize(width, height);
        self.mode = DrawMode::Idle;
        self.restore_seq += 1;
        self.history.clear();
        self.history.reset(self.surface.capture()?);
        Ok(())
    }

    pub fn handle_pointer(&mut self, input: PointerInput) -> Result<(), SurfaceError> {
        match input {
            PointerInput::Down(point) => {
                self.pointer_down(point);
                Ok(())
            }
            PointerInput::Move(point) => {
                self.pointer_move(point);
                Ok(())
            }
            PointerInput::Up => self.pointer_up(),
        }
    }

    pub fn pointer_down(&mut self, point: Point) {
        if !self.tool.draws() {
            return;
        }
        let Some(point) = point.normalize() else {
            return;
        };
        self.mode = DrawMode::Drawing;
        self.surface.begin_path(point);
    }

    pub fn pointer_move(&mut self, point: Point) {
        if self.mode != DrawMode::Drawing {
            return;
        }
        let Some(point) = point.normalize() else {
            return;
        };
        let Some(style) = self.tool.stroke_style(self.color) else {
            return;
        };
        self.surface.line_to(point, &style);
    }

    pub fn pointer_up(&mut self) -> Result<(), SurfaceError> {
        if !self.tool.draws() || self.mode != DrawMode::Drawing {
            return Ok(());
        }
        self.mode = DrawMode::Idle;
        self.surface.close_path();
        self.checkpoint()
    }

    /// Records the current surface as a new history entry. Undos still
    /// decoding at this point are dropped.
    pub fn checkpoint(&mut self) -> Result<(), SurfaceError> {
        self.restore_seq += 1;
        let snapshot = self.surface.capture()?;
        self.history.push(snapshot);
        Ok(())
    }

    pub fn undo(&mut self) -> Option<PendingRestore<S::Snapshot>> {
        let snapshot = self.history.undo()?.clone();
        self.restore_seq += 1;
        Some(PendingRestore {
            seq: self.restore_seq,
            snapshot,
        })
    }

    /// Paints a decoded undo snapshot. Returns `false` without touching the
    /// surface when a newer undo has been requested since `seq` was issued.
    pub fn finish_restore(&mut self, seq: u64, decoded: &S::Decoded) -> bool {
        if seq != self.restore_seq {
            log::debug!("Dropping stale restore {seq}, latest is {}", self.restore_seq);
            return false;
        }
        self.surface.repaint(decoded);
        true
    }

    pub fn smart_fill<V: VectorScene>(&mut self, scene: &mut V, screen: Point) -> FillOutcome {
        if self.tool != Tool::SmartFill {
            return FillOutcome::Inactive;
        }
        let shape = match resolve_fill_target(scene, screen) {
            Ok(Some(shape)) => shape,
            Ok(None) => {
                log::info!("No fillable element found at click position");
                return FillOutcome::Missed;
            }
            Err(error) => {
                log::error!("Smart fill error: {error}");
                return FillOutcome::Failed(error.to_string());
            }
        };
        let label = scene.describe(&shape);
        if let Err(error) = scene.set_fill(&shape, self.color) {
            log::error!("Smart fill error on {label}: {error}");
            return FillOutcome::Failed(error.to_string());
        }
        if let Err(error) = self.checkpoint() {
            log::warn!("Filled {label} but could not record history: {error}");
        }
        log::info!("Filled element: {label} with {}", self.color);
        FillOutcome::Filled(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, ViewMapping};
    use crate::history::HISTORY_LIMIT;
    use crate::scene::mock::MockScene;
    use crate::tool::StrokeStyle;

    /// Records calls; snapshots are the number of segments drawn so far.
    #[derive(Default)]
    struct RecordingSurface {
        size: (u32, u32),
        segments: Vec<(Point, StrokeStyle)>,
        repainted: Vec<usize>,
        fail_capture: bool,
    }

    impl RasterSurface for RecordingSurface {
        type Snapshot = usize;
        type Decoded = usize;

        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.segments.clear();
        }

        fn begin_path(&mut self, _at: Point) {}

        fn line_to(&mut self, to: Point, style: &StrokeStyle) {
            self.segments.push((to, *style));
        }

        fn close_path(&mut self) {}

        fn capture(&self) -> Result<usize, SurfaceError> {
            if self.fail_capture {
                return Err(SurfaceError::Capture("tainted".to_string()));
            }
            Ok(self.segments.len())
        }

        fn repaint(&mut self, decoded: &usize) {
            self.repainted.push(*decoded);
        }
    }

    fn session(tool: Tool) -> Session<RecordingSurface> {
        Session::new(RecordingSurface::default(), tool, Rgb::new(10, 20, 30)).unwrap()
    }

    fn stroke(session: &mut Session<RecordingSurface>) {
        session.pointer_down(Point::new(0.0, 0.0));
        session.pointer_move(Point::new(5.0, 5.0));
        session.pointer_up().unwrap();
    }

    #[test]
    fn test_new_session_has_baseline() {
        let session = session(Tool::Pen);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.mode(), DrawMode::Idle);
    }

    #[test]
    fn test_stroke_uses_active_tool_and_color() {
        let mut session = session(Tool::Brush);
        stroke(&mut session);
        let (_, style) = session.surface().segments[0];
        assert_eq!(style.width, 12.0);
        assert_eq!(style.color, Rgb::new(10, 20, 30));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_move_without_down_draws_nothing() {
        let mut session = session(Tool::Pen);
        session.pointer_move(Point::new(1.0, 1.0));
        session.pointer_up().unwrap();
        assert!(session.surface().segments.is_empty());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_smart_fill_suppresses_strokes() {
        let mut session = session(Tool::SmartFill);
        stroke(&mut session);
        assert!(session.surface().segments.is_empty());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.mode(), DrawMode::Idle);
    }

    #[test]
    fn test_switching_tool_ends_stroke() {
        let mut session = session(Tool::Pen);
        session.pointer_down(Point::new(0.0, 0.0));
        let chrome = session.select_tool(Tool::SmartFill);
        assert_eq!(chrome.cursor, "crosshair");
        assert_eq!(session.mode(), DrawMode::Idle);
        assert_eq!(session.history().len(), 2);
        session.pointer_move(Point::new(3.0, 3.0));
        assert!(session.surface().segments.is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = session(Tool::Pen);
        for _ in 0..30 {
            stroke(&mut session);
        }
        assert_eq!(session.history().len(), HISTORY_LIMIT);
        assert_eq!(session.history().iter().next(), Some(&11));
    }

    #[test]
    fn test_undo_restores_previous_snapshot() {
        let mut session = session(Tool::Pen);
        stroke(&mut session);
        stroke(&mut session);
        let pending = session.undo().unwrap();
        assert_eq!(pending.snapshot, 1);
        assert!(session.finish_restore(pending.seq, &pending.snapshot));
        assert_eq!(session.surface().repainted, vec![1]);
    }

    #[test]
    fn test_undo_stops_at_baseline() {
        let mut session = session(Tool::Pen);
        stroke(&mut session);
        assert!(session.undo().is_some());
        assert!(session.undo().is_none());
        assert!(session.undo().is_none());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_stale_restore_is_dropped() {
        let mut session = session(Tool::Pen);
        stroke(&mut session);
        stroke(&mut session);
        let first = session.undo().unwrap();
        let second = session.undo().unwrap();
        assert!(session.finish_restore(second.seq, &second.snapshot));
        assert!(!session.finish_restore(first.seq, &first.snapshot));
        assert_eq!(session.surface().repainted, vec![0]);
    }

    #[test]
    fn test_restore_dropped_after_resize() {
        let mut session = session(Tool::Pen);
        stroke(&mut session);
        stroke(&mut session);
        let pending = session.undo().unwrap();
        session.resize(64, 64).unwrap();
        assert!(!session.finish_restore(pending.seq, &pending.snapshot));
        assert!(session.surface().repainted.is_empty());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_restore_dropped_after_new_stroke() {
        let mut session = session(Tool::Pen);
        stroke(&mut session);
        stroke(&mut session);
        let pending = session.undo().unwrap();
        stroke(&mut session);
        assert!(!session.finish_restore(pending.seq, &pending.snapshot));
        assert!(session.surface().repainted.is_empty());
        assert_eq!(session.history().current(), Some(&3));
    }

    #[test]
    fn test_failed_capture_on_resize_drops_old_history() {
        let mut session = session(Tool::Pen);
        stroke(&mut session);
        stroke(&mut session);
        session.surface_mut().fail_capture = true;
        assert!(session.resize(10, 10).is_err());
        assert!(session.history().is_empty());
        assert!(session.undo().is_none());
    }

    #[test]
    fn test_resize_resets_to_blank_baseline() {
        let mut session = session(Tool::Pen);
        stroke(&mut session);
        stroke(&mut session);
        session.resize(320, 240).unwrap();
        assert_eq!(session.surface().size(), (320, 240));
        assert!(session.surface().segments.is_empty());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().current(), Some(&0));
    }

    #[test]
    fn test_smart_fill_recolors_hit_shape() {
        let mut session = session(Tool::SmartFill);
        let mut scene = MockScene::new(Some(ViewMapping {
            container: Rect::new(0.0, 0.0, 100.0, 100.0),
            view_box: Rect::new(0.0, 0.0, 100.0, 100.0),
        }));
        let wing = scene.add("path", Some(Rect::new(10.0, 10.0, 20.0, 20.0)));

        let outcome = session.smart_fill(&mut scene, Point::new(15.0, 15.0));
        assert_eq!(outcome, FillOutcome::Filled("path#0".to_string()));
        assert_eq!(scene.elements[wing].fill, Some(Rgb::new(10, 20, 30)));
        assert_eq!(session.history().len(), 2);

        let outcome = session.smart_fill(&mut scene, Point::new(90.0, 90.0));
        assert_eq!(outcome, FillOutcome::Missed);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_smart_fill_inactive_for_drawing_tools() {
        let mut session = session(Tool::Pen);
        let mut scene = MockScene::new(None);
        let shape = scene.add("rect", Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        scene.hit = Some(shape);
        assert_eq!(
            session.smart_fill(&mut scene, Point::new(1.0, 1.0)),
            FillOutcome::Inactive
        );
        assert_eq!(scene.elements[shape].fill, None);
    }

    #[test]
    fn test_handle_pointer_matches_direct_calls() {
        let mut session = session(Tool::Pen);
        session
            .handle_pointer(PointerInput::Down(Point::new(0.0, 0.0)))
            .unwrap();
        session
            .handle_pointer(PointerInput::Move(Point::new(2.0, 2.0)))
            .unwrap();
        session.handle_pointer(PointerInput::Up).unwrap();
        assert_eq!(session.surface().segments.len(), 1);
        assert_eq!(session.history().len(), 2);
    }
}
