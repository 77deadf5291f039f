use super::context::Viewport;
use crate::models::Position;

/// Distance kept between a dragged object's origin and the far viewport edge.
pub(crate) const EDGE_MARGIN: f64 = 50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Allowed range for a dragged position:
/// `[scroll, scroll + extent - 50]` on each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DragBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl DragBounds {
    pub fn from_viewport(v: &Viewport) -> Self {
        Self {
            min_x: v.scroll_x,
            min_y: v.scroll_y,
            max_x: v.scroll_x + v.width - EDGE_MARGIN,
            max_y: v.scroll_y + v.height - EDGE_MARGIN,
        }
    }

    /// Lower bound wins when the viewport is narrower than the margin.
    pub fn clamp(&self, p: Position) -> Position {
        Position {
            x: p.x.min(self.max_x).max(self.min_x),
            y: p.y.min(self.max_y).max(self.min_y),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        start: Point,
        base: Position,
        /// Latest pointer not yet applied by a frame.
        pending: Option<Point>,
        current: Position,
    },
}

/// `Idle -> Dragging -> Idle` for one draggable object.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct DragController {
    state: DragState,
}

impl DragController {
    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Returns false (and changes nothing) while a drag is already running.
    pub fn begin(&mut self, pointer: Point, base: Position) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = DragState::Dragging {
            start: pointer,
            base,
            pending: None,
            current: base,
        };
        true
    }

    /// Record a move. True means a frame should be scheduled; any frame
    /// already scheduled is superseded by this pointer.
    pub fn track(&mut self, pointer: Point) -> bool {
        match &mut self.state {
            DragState::Dragging { pending, .. } => {
                *pending = Some(pointer);
                true
            }
            DragState::Idle => false,
        }
    }

    /// Apply the latest pending move. Returns the position to render.
    pub fn frame(&mut self, bounds: &DragBounds) -> Option<Position> {
        let DragState::Dragging {
            start,
            base,
            pending,
            current,
        } = &mut self.state
        else {
            return None;
        };
        let pointer = pending.take()?;
        *current = bounds.clamp(Position::new(
            base.x + (pointer.x - start.x),
            base.y + (pointer.y - start.y),
        ));
        Some(*current)
    }

    /// End the gesture. A move that never got its frame is applied first, so
    /// the returned position is the final clamped one.
    pub fn finish(&mut self, bounds: &DragBounds) -> Option<Position> {
        self.frame(bounds);
        match std::mem::take(&mut self.state) {
            DragState::Dragging { current, .. } => Some(current),
            DragState::Idle => None,
        }
    }

    /// Drop the gesture without a result.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
