use crate::geometry::Point;

/// Pointer input in surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Down(Point),
    Move(Point),
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

impl TouchPhase {
    /// Mouse event type a touch of this phase is re-dispatched as.
    pub fn mouse_event_type(self) -> &'static str {
        match self {
            TouchPhase::Start => "mousedown",
            TouchPhase::Move => "mousemove",
            TouchPhase::End => "mouseup",
        }
    }

    /// Translates a touch into pointer input using the first touch point.
    /// A start or move without any touch point has nothing to report.
    pub fn to_pointer(self, first_touch: Option<Point>) -> Option<PointerInput> {
        match self {
            TouchPhase::Start => first_touch.and_then(Point::normalize).map(PointerInput::Down),
            TouchPhase::Move => first_touch.and_then(Point::normalize).map(PointerInput::Move),
            TouchPhase::End => Some(PointerInput::Up),
        }
    }
}
