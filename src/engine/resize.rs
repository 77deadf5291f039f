use super::drag::Point;
use crate::models::Size;

#[derive(Clone, Debug, Default, PartialEq)]
enum ResizeState {
    #[default]
    Idle,
    Resizing {
        start: Point,
        base: Size,
        pending: Option<Point>,
        current: Size,
    },
}

/// `Idle -> Resizing -> Idle`, driven from the bottom-right handle.
///
/// Sizes are clamped to the note bounds only; the viewport does not limit a
/// resize.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ResizeController {
    state: ResizeState,
}

impl ResizeController {
    pub fn is_active(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    pub fn begin(&mut self, pointer: Point, base: Size) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = ResizeState::Resizing {
            start: pointer,
            base,
            pending: None,
            current: base,
        };
        true
    }

    pub fn track(&mut self, pointer: Point) -> bool {
        match &mut self.state {
            ResizeState::Resizing { pending, .. } => {
                *pending = Some(pointer);
                true
            }
            ResizeState::Idle => false,
        }
    }

    pub fn frame(&mut self) -> Option<Size> {
        let ResizeState::Resizing {
            start,
            base,
            pending,
            current,
        } = &mut self.state
        else {
            return None;
        };
        let pointer = pending.take()?;
        *current = Size::new(
            base.width + (pointer.x - start.x),
            base.height + (pointer.y - start.y),
        )
        .clamped();
        Some(*current)
    }

    pub fn finish(&mut self) -> Option<Size> {
        self.frame();
        match std::mem::take(&mut self.state) {
            ResizeState::Resizing { current, .. } => Some(current),
            ResizeState::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = ResizeState::Idle;
    }
}
