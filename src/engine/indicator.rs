use super::drag::{DragController, Point};
use crate::models::{NoteId, Position};
use strum::{EnumIter, IntoStaticStr};

/// Small handle standing in for a hidden note.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Indicator {
    pub position: Position,
    pub drag: DragController,
}

impl Indicator {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            drag: DragController::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr, EnumIter)]
pub(crate) enum MenuAction {
    #[strum(serialize = "Show note")]
    Show,
    #[strum(serialize = "Delete note")]
    Delete,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// The single context menu a board can show.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ContextMenu {
    pub note_id: NoteId,
    pub anchor: Point,
}

/// Mouse button numbers as reported by pointer events.
pub(crate) const PRIMARY_BUTTON: i16 = 0;

pub(crate) fn starts_indicator_drag(button: i16) -> bool {
    button == PRIMARY_BUTTON
}
