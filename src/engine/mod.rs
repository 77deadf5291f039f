//! Headless note board.
//!
//! Everything here is plain data: the browser layer feeds pointer positions
//! and viewport changes in, and renders whatever the board holds. Committing
//! writes to a note's attribute store happen only through
//! [`NoteBoard::update_note_data`].

mod color;
mod context;
mod drag;
mod image;
mod indicator;
mod rescale;
mod resize;

pub(crate) use color::{restyle, ColorTarget};
pub(crate) use context::{Host, Viewport};
pub(crate) use drag::Point;
pub(crate) use image::{ImageSource, NormalizedImage, IMAGE_STYLE};
pub(crate) use indicator::MenuAction;

use crate::config::NotesConfig;
use crate::content::{insert_at_caret, strip_inherited_formatting};
use crate::error::{NoteError, NoteResult};
use crate::models::{NoteColor, NoteId, NoteRecord, Position, Size};
use crate::serializer::{self, NoteTree};
use crate::store::{AttributeStore, NoteField};
use context::EngineContext;
use drag::{DragBounds, DragController};
use indicator::{starts_indicator_drag, ContextMenu, Indicator};
use leptos::logging::{log, warn};
use rescale::ViewportRescaler;
use resize::ResizeController;
use std::str::FromStr;

/// Margin kept between a randomly placed note and the top-left edges.
const PLACEMENT_MARGIN: f64 = 20.0;
/// Room reserved on the right when picking a random x.
const PLACEMENT_RESERVE_X: f64 = 350.0;
/// Room reserved at the bottom when picking a random y.
const PLACEMENT_RESERVE_Y: f64 = 250.0;

/// What the renderer shows for a note.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Widget {
    pub position: Position,
    pub size: Size,
    pub z_index: i64,
    pub hidden: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct NoteEntry {
    pub store: AttributeStore,
    pub widget: Widget,
    pub indicator: Option<Indicator>,
    drag: DragController,
    resize: ResizeController,
    line_break_at: Option<i64>,
}

impl NoteEntry {
    fn new(record: NoteRecord, z_index: i64) -> Self {
        let widget = Widget {
            position: record.position,
            size: record.size,
            z_index,
            hidden: false,
        };
        Self {
            store: AttributeStore::new(record),
            widget,
            indicator: None,
            drag: DragController::default(),
            resize: ResizeController::default(),
            line_break_at: None,
        }
    }

    pub fn id(&self) -> &str {
        self.store.id()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Store writes keep the widget geometry in step.
    fn write(&mut self, field: NoteField) {
        match &field {
            NoteField::Position(p) => self.widget.position = *p,
            NoteField::Size(s) => self.widget.size = *s,
            _ => {}
        }
        self.store.set(field);
    }

    fn cancel_gestures(&mut self) -> Vec<GestureKind> {
        let mut cancelled = Vec::new();
        if self.drag.is_active() {
            self.drag.cancel();
            cancelled.push(GestureKind::Drag);
        }
        if self.resize.is_active() {
            self.resize.cancel();
            cancelled.push(GestureKind::Resize);
        }
        if let Some(ind) = self.indicator.as_mut() {
            if ind.drag.is_active() {
                ind.drag.cancel();
                cancelled.push(GestureKind::IndicatorDrag);
            }
        }
        cancelled
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum GestureKind {
    Drag,
    Resize,
    IndicatorDrag,
}

/// Identifies one running pointer gesture.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct GestureKey {
    pub note_id: NoteId,
    pub kind: GestureKind,
}

impl GestureKey {
    fn new(note_id: &str, kind: GestureKind) -> Self {
        Self {
            note_id: note_id.to_string(),
            kind,
        }
    }
}

/// Where on a note a pointer went down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HitRegion {
    /// Toolbar background.
    DragHandle,
    /// Bottom-right corner.
    ResizeHandle,
    /// Note root outside toolbar and editable regions.
    Chrome,
    /// Title or content editor, or a toolbar button.
    Content,
}

impl HitRegion {
    /// Non-editable parts of the note frame.
    pub fn is_chrome(self) -> bool {
        matches!(self, HitRegion::DragHandle | HitRegion::Chrome)
    }

    /// Pressing here lifts the note; editors and buttons leave stacking alone.
    pub fn raises_note(self) -> bool {
        self != HitRegion::Content
    }
}

pub(crate) struct NoteBoard<H: Host> {
    host: H,
    ctx: EngineContext,
    notes: Vec<NoteEntry>,
    rescaler: ViewportRescaler,
    context_menu: Option<ContextMenu>,
    image_target: Option<NoteId>,
    color_target: Option<NoteId>,
    line_break_window_ms: i64,
}

impl<H: Host> NoteBoard<H> {
    pub fn new(host: H, page_id: String, config: &NotesConfig) -> Self {
        let width = host.viewport().width;
        Self {
            host,
            ctx: EngineContext::new(page_id, config.base_z_index),
            notes: Vec::new(),
            rescaler: ViewportRescaler::new(width),
            context_menu: None,
            image_target: None,
            color_target: None,
            line_break_window_ms: config.line_break_window_ms,
        }
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ---- queries ----

    pub fn note(&self, id: &str) -> Option<&NoteEntry> {
        self.notes.iter().find(|n| n.id() == id)
    }

    fn note_mut(&mut self, id: &str) -> Option<&mut NoteEntry> {
        self.notes.iter_mut().find(|n| n.id() == id)
    }

    /// Open notes in creation order.
    pub fn note_ids(&self) -> Vec<NoteId> {
        self.notes.iter().map(|n| n.id().to_string()).collect()
    }

    pub fn indicator_ids(&self) -> Vec<NoteId> {
        self.notes
            .iter()
            .filter(|n| n.indicator.is_some())
            .map(|n| n.id().to_string())
            .collect()
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn image_target(&self) -> Option<&str> {
        self.image_target.as_deref()
    }

    pub fn color_target(&self) -> Option<&str> {
        self.color_target.as_deref()
    }

    // ---- creation ----

    /// New empty note at a random spot inside the viewport.
    pub fn create_note(&mut self) -> NoteId {
        let v = self.host.viewport();
        let x = (self.host.random_unit() * (v.width - PLACEMENT_RESERVE_X)).max(PLACEMENT_MARGIN);
        let y = (self.host.random_unit() * (v.height - PLACEMENT_RESERVE_Y)).max(PLACEMENT_MARGIN);
        self.spawn(Position::new(x, y))
    }

    /// Coordinates that are not both positive fall back to random placement.
    pub fn create_note_at_position(&mut self, x: f64, y: f64) -> NoteId {
        if x <= 0.0 || y <= 0.0 {
            return self.create_note();
        }
        self.spawn(Position::new(x, y))
    }

    /// Next generated id that no open note already uses.
    fn fresh_id(&mut self) -> NoteId {
        let now = self.host.now_ms();
        loop {
            let id = self.ctx.next_note_id(now);
            if self.note(&id).is_none() {
                return id;
            }
        }
    }

    fn spawn(&mut self, position: Position) -> NoteId {
        let id = self.fresh_id();
        let record = NoteRecord::new(
            id.clone(),
            self.ctx.page_id().to_string(),
            position,
            Size::default(),
            self.host.now_iso(),
        );
        let z = self.ctx.next_z_index();
        self.notes.push(NoteEntry::new(record, z));
        id
    }

    /// Restore a note from a serialized tree.
    ///
    /// `Ok(None)` when a note with the same id is already open.
    pub fn create_note_from_data(&mut self, tree: &NoteTree) -> NoteResult<Option<NoteId>> {
        let mut record = serializer::deserialize(tree)?;

        if record.id.trim().is_empty() {
            record.id = self.fresh_id();
        }
        if self.note(&record.id).is_some() {
            log!("{}", NoteError::duplicate_id(&record.id));
            return Ok(None);
        }
        if record.page_id.is_empty() {
            record.page_id = self.ctx.page_id().to_string();
        }
        if record.created_at.is_empty() {
            record.created_at = self.host.now_iso();
        }
        record.size = record.size.clamped();

        let id = record.id.clone();
        let hidden = record.hidden;
        let z = self.ctx.next_z_index();
        self.notes.push(NoteEntry::new(record, z));
        if hidden {
            self.hide_note(&id);
        }
        Ok(Some(id))
    }

    pub fn create_note_from_json(&mut self, json: &str) -> NoteResult<Option<NoteId>> {
        let tree = serializer::parse_tree(json)?;
        self.create_note_from_data(&tree)
    }

    // ---- data ----

    /// The single committing write path. Hidden flips run the full
    /// hide/show transition.
    pub fn update_note_data(&mut self, id: &str, field: NoteField) -> bool {
        match field {
            NoteField::Hidden(true) => self.hide_note(id),
            NoteField::Hidden(false) => self.show_note(id),
            field => match self.note_mut(id) {
                Some(entry) => {
                    entry.write(field);
                    true
                }
                None => {
                    log!("{}", NoteError::missing_target("note update"));
                    false
                }
            },
        }
    }

    /// Remember that Enter was pressed in this note's content.
    pub fn mark_line_break(&mut self, id: &str) {
        let now = self.host.now_ms();
        if let Some(entry) = self.note_mut(id) {
            entry.line_break_at = Some(now);
        }
    }

    /// Commit edited content. Within the line-break window the new markup is
    /// normalized first; the normalized markup is returned when it differs
    /// from what the editor holds.
    pub fn commit_content(&mut self, id: &str, content: String) -> Option<String> {
        let now = self.host.now_ms();
        let window = self.line_break_window_ms;
        let entry = self.note_mut(id)?;

        let after_break = entry
            .line_break_at
            .take()
            .is_some_and(|at| now - at <= window);
        let committed = if after_break {
            strip_inherited_formatting(entry.store.content(), &content)
        } else {
            content.clone()
        };

        let changed = committed != content;
        entry.write(NoteField::Content(committed.clone()));
        changed.then_some(committed)
    }

    pub fn serialize_note(&self, id: &str) -> Option<NoteTree> {
        self.note(id).map(|n| serializer::serialize(n.store.record()))
    }

    // ---- stacking ----

    /// Pointer went down on `region` of a note. Returns whether it moved up.
    pub fn press_note(&mut self, id: &str, region: HitRegion) -> bool {
        region.raises_note() && self.bring_to_front(id)
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        if self.note(id).is_none() {
            return false;
        }
        let z = self.ctx.next_z_index();
        if let Some(entry) = self.note_mut(id) {
            entry.widget.z_index = z;
        }
        true
    }

    // ---- gestures ----

    /// Start a drag from the toolbar background. Raises the note.
    pub fn begin_drag(&mut self, id: &str, region: HitRegion, pointer: Point) -> Option<GestureKey> {
        if region != HitRegion::DragHandle {
            return None;
        }
        let entry = self.note_mut(id)?;
        if entry.widget.hidden || entry.resize.is_active() {
            return None;
        }
        let base = entry.widget.position;
        if !entry.drag.begin(pointer, base) {
            return None;
        }
        self.bring_to_front(id);
        Some(GestureKey::new(id, GestureKind::Drag))
    }

    pub fn begin_resize(&mut self, id: &str, region: HitRegion, pointer: Point) -> Option<GestureKey> {
        if region != HitRegion::ResizeHandle {
            return None;
        }
        let entry = self.note_mut(id)?;
        if entry.widget.hidden || entry.drag.is_active() {
            return None;
        }
        let base = entry.widget.size;
        entry
            .resize
            .begin(pointer, base)
            .then(|| GestureKey::new(id, GestureKind::Resize))
    }

    pub fn begin_indicator_drag(&mut self, id: &str, button: i16, pointer: Point) -> Option<GestureKey> {
        if !starts_indicator_drag(button) {
            return None;
        }
        let ind = self.note_mut(id)?.indicator.as_mut()?;
        let base = ind.position;
        ind.drag
            .begin(pointer, base)
            .then(|| GestureKey::new(id, GestureKind::IndicatorDrag))
    }

    /// Record a pointer move. True when a frame should be scheduled.
    pub fn track_pointer(&mut self, key: &GestureKey, pointer: Point) -> bool {
        let Some(entry) = self.note_mut(&key.note_id) else {
            return false;
        };
        match key.kind {
            GestureKind::Drag => entry.drag.track(pointer),
            GestureKind::Resize => entry.resize.track(pointer),
            GestureKind::IndicatorDrag => entry
                .indicator
                .as_mut()
                .is_some_and(|ind| ind.drag.track(pointer)),
        }
    }

    /// Apply the latest move visually. The store is not written.
    pub fn run_frame(&mut self, key: &GestureKey) -> bool {
        let bounds = DragBounds::from_viewport(&self.host.viewport());
        let Some(entry) = self.note_mut(&key.note_id) else {
            return false;
        };
        match key.kind {
            GestureKind::Drag => {
                let Some(p) = entry.drag.frame(&bounds) else {
                    return false;
                };
                entry.widget.position = p;
            }
            GestureKind::Resize => {
                let Some(s) = entry.resize.frame() else {
                    return false;
                };
                entry.widget.size = s;
            }
            GestureKind::IndicatorDrag => {
                let Some(ind) = entry.indicator.as_mut() else {
                    return false;
                };
                let Some(p) = ind.drag.frame(&bounds) else {
                    return false;
                };
                ind.position = p;
            }
        }
        true
    }

    /// Pointer released: one committing write of the final geometry.
    pub fn end_gesture(&mut self, key: &GestureKey) -> bool {
        let bounds = DragBounds::from_viewport(&self.host.viewport());
        let Some(entry) = self.note_mut(&key.note_id) else {
            return false;
        };
        let field = match key.kind {
            GestureKind::Drag => entry.drag.finish(&bounds).map(NoteField::Position),
            GestureKind::Resize => entry.resize.finish().map(NoteField::Size),
            GestureKind::IndicatorDrag => entry.indicator.as_mut().and_then(|ind| {
                let p = ind.drag.finish(&bounds)?;
                ind.position = p;
                Some(NoteField::Position(p))
            }),
        };
        match field {
            Some(field) => self.update_note_data(&key.note_id, field),
            None => false,
        }
    }

    /// Abort every gesture on a note without committing.
    pub fn cancel_gestures(&mut self, id: &str) -> Vec<GestureKey> {
        self.note_mut(id)
            .map(|entry| entry.cancel_gestures())
            .unwrap_or_default()
            .into_iter()
            .map(|kind| GestureKey::new(id, kind))
            .collect()
    }

    // ---- viewport ----

    /// Rescale horizontal positions after the viewport width changed.
    pub fn on_viewport_resize(&mut self) -> bool {
        let width = self.host.viewport().width;
        let Some(scale) = self.rescaler.rescale(width) else {
            return false;
        };

        let moves: Vec<(NoteId, Position)> = self
            .notes
            .iter_mut()
            .map(|entry| {
                if let Some(ind) = entry.indicator.as_mut() {
                    ind.position.x *= scale;
                }
                let p = entry.widget.position;
                (entry.id().to_string(), Position::new(p.x * scale, p.y))
            })
            .collect();

        for (id, p) in moves {
            self.update_note_data(&id, NoteField::Position(p));
        }
        true
    }

    // ---- visibility ----

    pub fn hide_note(&mut self, id: &str) -> bool {
        let Some(entry) = self.note_mut(id) else {
            log!("{}", NoteError::missing_target("hide"));
            return false;
        };
        if entry.indicator.is_some() {
            return false;
        }
        entry.drag.cancel();
        entry.resize.cancel();
        // Drop any uncommitted frame geometry.
        entry.widget.position = entry.store.position();
        entry.widget.size = entry.store.size();
        let at = entry.widget.position;
        entry.widget.hidden = true;
        entry.store.set(NoteField::Hidden(true));
        entry.indicator = Some(Indicator::at(at));
        true
    }

    pub fn show_note(&mut self, id: &str) -> bool {
        let Some(entry) = self.note_mut(id) else {
            log!("{}", NoteError::missing_target("show"));
            return false;
        };
        if !entry.widget.hidden && entry.indicator.is_none() {
            return false;
        }
        entry.store.set(NoteField::Hidden(false));
        entry.widget.hidden = false;
        entry.widget.position = entry.store.position();
        entry.indicator = None;
        if self.context_menu.as_ref().is_some_and(|m| m.note_id == id) {
            self.context_menu = None;
        }
        true
    }

    /// Drop the note, its indicator and any gesture or dialog aimed at it.
    pub fn remove_note(&mut self, id: &str) -> bool {
        let Some(idx) = self.notes.iter().position(|n| n.id() == id) else {
            log!("{}", NoteError::missing_target("remove"));
            return false;
        };
        let mut entry = self.notes.remove(idx);
        entry.cancel_gestures();

        if self.context_menu.as_ref().is_some_and(|m| m.note_id == id) {
            self.context_menu = None;
        }
        if self.image_target.as_deref() == Some(id) {
            self.image_target = None;
        }
        if self.color_target.as_deref() == Some(id) {
            self.color_target = None;
        }
        true
    }

    // ---- context menu ----

    /// Open the menu for a hidden note's indicator, replacing any open menu.
    pub fn open_context_menu(&mut self, id: &str, anchor: Point) -> bool {
        self.context_menu = None;
        if self.note(id).and_then(|n| n.indicator.as_ref()).is_none() {
            return false;
        }
        self.context_menu = Some(ContextMenu {
            note_id: id.to_string(),
            anchor,
        });
        true
    }

    pub fn context_menu_action(&mut self, action: MenuAction) -> bool {
        let Some(menu) = self.context_menu.take() else {
            return false;
        };
        match action {
            MenuAction::Show => self.show_note(&menu.note_id),
            MenuAction::Delete => self.remove_note(&menu.note_id),
        }
    }

    pub fn dismiss_context_menu(&mut self) -> bool {
        self.context_menu.take().is_some()
    }

    // ---- dialogs and styling ----

    pub fn request_image_dialog(&mut self, id: &str) -> bool {
        if self.note(id).is_none() {
            return false;
        }
        self.image_target = Some(id.to_string());
        true
    }

    pub fn request_color_dialog(&mut self, id: &str) -> bool {
        if self.note(id).is_none() {
            return false;
        }
        self.color_target = Some(id.to_string());
        true
    }

    /// Insert an image into the image target's content at byte offset
    /// `caret`, or at the end. Returns the target id and its new content.
    pub fn insert_image(&mut self, source: &ImageSource, caret: Option<usize>) -> Option<(NoteId, String)> {
        let Some(id) = self.image_target.clone() else {
            log!("{}", NoteError::missing_target("image insertion"));
            return None;
        };
        let image = NormalizedImage::from_source(source)?;
        let entry = self.note_mut(&id)?;
        let content = insert_at_caret(entry.store.content(), caret, &image.markup());
        entry.write(NoteField::Content(content.clone()));
        Some((id, content))
    }

    /// Apply a palette token to the color target. Unknown tokens are an
    /// error; a missing target is not.
    pub fn change_note_background_color(&mut self, token: &str) -> NoteResult<bool> {
        let color = NoteColor::from_str(token.trim())
            .map_err(|_| NoteError::parse(format!("unknown color token `{token}`")))?;
        let Some(id) = self.color_target.clone() else {
            log!("{}", NoteError::missing_target("color change"));
            return Ok(false);
        };
        Ok(self.apply_color(&id, color))
    }

    pub fn apply_color(&mut self, id: &str, color: NoteColor) -> bool {
        self.update_note_data(id, NoteField::BackgroundColor(color))
    }
}

/// Log a rejected restore and keep going.
pub(crate) fn report_restore_error(e: &NoteError) {
    warn!("{e}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoteErrorKind;
    use crate::store::NoteKey;

    struct TestHost {
        viewport: Viewport,
        now: i64,
        random: f64,
    }

    impl Host for TestHost {
        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn now_ms(&self) -> i64 {
            self.now
        }

        fn now_iso(&self) -> String {
            format!("t{}", self.now)
        }

        fn random_unit(&self) -> f64 {
            self.random
        }
    }

    fn board() -> NoteBoard<TestHost> {
        let host = TestHost {
            viewport: Viewport::new(1024.0, 768.0),
            now: 1_000,
            random: 0.5,
        };
        NoteBoard::new(host, "page_1".to_string(), &NotesConfig::default())
    }

    fn drag(b: &mut NoteBoard<TestHost>, id: &str, delta: (f64, f64)) -> bool {
        let Some(key) = b.begin_drag(id, HitRegion::DragHandle, Point::new(0.0, 0.0)) else {
            return false;
        };
        b.track_pointer(&key, Point::new(delta.0, delta.1));
        b.run_frame(&key);
        b.end_gesture(&key)
    }

    fn hidden_tree(id: &str) -> NoteTree {
        serde_json::json!({
            "id": id,
            "pageId": "page_1",
            "title": "Later",
            "content": "<b>x</b>",
            "position": {"x": 40, "y": 60},
            "size": {"width": 320, "height": 260},
            "isHidden": true,
            "backgroundColor": "bg-green-200",
            "createdAt": "t0"
        })
    }

    #[test]
    fn test_create_note_random_placement() {
        let mut b = board();
        let id = b.create_note();
        let n = b.note(&id).expect("note");
        // 0.5 * (1024 - 350), 0.5 * (768 - 250)
        assert_eq!(n.widget.position, Position::new(337.0, 259.0));
        assert_eq!(n.store.position(), n.widget.position);
        assert_eq!(n.store.size(), Size::new(300.0, 250.0));
        assert_eq!(n.store.record().page_id, "page_1");
        assert_eq!(n.store.record().created_at, "t1000");
    }

    #[test]
    fn test_random_placement_keeps_margin() {
        let mut b = board();
        b.host_mut().random = 0.0;
        let id = b.create_note();
        assert_eq!(b.note(&id).map(|n| n.widget.position), Some(Position::new(20.0, 20.0)));
    }

    #[test]
    fn test_create_at_position_and_fallback() {
        let mut b = board();
        let placed = b.create_note_at_position(150.0, 90.0);
        assert_eq!(b.note(&placed).map(|n| n.store.position()), Some(Position::new(150.0, 90.0)));

        let fallback = b.create_note_at_position(0.0, 90.0);
        assert_eq!(b.note(&fallback).map(|n| n.store.position()), Some(Position::new(337.0, 259.0)));
        assert_ne!(placed, fallback);
    }

    #[test]
    fn test_title_and_resize_clamp_then_serialize() {
        let mut b = board();
        let id = b.create_note();
        assert!(b.update_note_data(&id, NoteField::Title("Test".to_string())));

        let key = b
            .begin_resize(&id, HitRegion::ResizeHandle, Point::new(0.0, 0.0))
            .expect("resize starts");
        b.track_pointer(&key, Point::new(700.0, 0.0));
        assert!(b.run_frame(&key));
        assert!(b.end_gesture(&key));

        let tree = b.serialize_note(&id).expect("tree");
        assert_eq!(tree["title"], "Test");
        assert_eq!(tree["size"]["width"], 800.0);
        assert_eq!(tree["size"]["height"], 250.0);
    }

    #[test]
    fn test_resize_not_limited_by_viewport() {
        let mut b = board();
        b.host_mut().viewport = Viewport::new(320.0, 240.0);
        let id = b.create_note_at_position(100.0, 100.0);
        let key = b
            .begin_resize(&id, HitRegion::ResizeHandle, Point::new(0.0, 0.0))
            .expect("resize");
        b.track_pointer(&key, Point::new(200.0, 200.0));
        b.end_gesture(&key);
        assert_eq!(b.note(&id).map(|n| n.store.size()), Some(Size::new(500.0, 450.0)));
    }

    #[test]
    fn test_restore_hidden_note_has_one_indicator() {
        let mut b = board();
        let id = b
            .create_note_from_data(&hidden_tree("note_9_9"))
            .expect("valid tree")
            .expect("new note");
        let n = b.note(&id).expect("note");
        assert!(n.widget.hidden);
        assert!(n.store.is_hidden());
        assert_eq!(b.indicator_ids(), vec![id.clone()]);
        assert_eq!(
            n.indicator.as_ref().map(|i| i.position),
            Some(Position::new(40.0, 60.0))
        );
        assert_eq!(n.store.color(), NoteColor::Green);
    }

    #[test]
    fn test_drag_clamps_to_viewport() {
        let mut b = board();
        let id = b.create_note_at_position(100.0, 100.0);
        assert!(drag(&mut b, &id, (5000.0, 5000.0)));
        let n = b.note(&id).expect("note");
        assert_eq!(n.store.position(), Position::new(974.0, 718.0));
        assert_eq!(n.widget.position, Position::new(974.0, 718.0));
        assert!(!n.is_dragging());
    }

    #[test]
    fn test_frames_move_widget_but_not_store() {
        let mut b = board();
        let id = b.create_note_at_position(100.0, 100.0);
        let key = b
            .begin_drag(&id, HitRegion::DragHandle, Point::new(0.0, 0.0))
            .expect("drag");
        assert!(b.track_pointer(&key, Point::new(10.0, 20.0)));
        assert!(b.run_frame(&key));
        let n = b.note(&id).expect("note");
        assert_eq!(n.widget.position, Position::new(110.0, 120.0));
        assert_eq!(n.store.position(), Position::new(100.0, 100.0));
    }

    #[test]
    fn test_drag_only_from_handle_and_exclusive_with_resize() {
        let mut b = board();
        let id = b.create_note_at_position(100.0, 100.0);
        assert!(b.begin_drag(&id, HitRegion::Content, Point::default()).is_none());
        assert!(b.begin_drag(&id, HitRegion::Chrome, Point::default()).is_none());

        let key = b.begin_drag(&id, HitRegion::DragHandle, Point::default());
        assert!(key.is_some());
        assert!(b.begin_drag(&id, HitRegion::DragHandle, Point::default()).is_none());
        assert!(b.begin_resize(&id, HitRegion::ResizeHandle, Point::default()).is_none());
    }

    #[test]
    fn test_viewport_width_change_rescales_x_only() {
        let mut b = board();
        let id = b.create_note_at_position(200.0, 150.0);
        let hidden = b
            .create_note_from_data(&hidden_tree("note_h"))
            .expect("tree")
            .expect("note");

        b.host_mut().viewport = Viewport::new(512.0, 400.0);
        assert!(b.on_viewport_resize());

        let n = b.note(&id).expect("note");
        assert_eq!(n.store.position(), Position::new(100.0, 150.0));
        assert_eq!(n.widget.position, Position::new(100.0, 150.0));
        let h = b.note(&hidden).expect("hidden");
        assert_eq!(h.indicator.as_ref().map(|i| i.position), Some(Position::new(20.0, 60.0)));

        // Same width again does nothing.
        assert!(!b.on_viewport_resize());
    }

    #[test]
    fn test_restore_same_id_twice_creates_one_note() {
        let mut b = board();
        let tree = hidden_tree("note_dup");
        assert!(b.create_note_from_data(&tree).expect("tree").is_some());
        assert_eq!(b.create_note_from_data(&tree).expect("tree"), None);
        assert_eq!(b.note_ids(), vec!["note_dup".to_string()]);
        assert_eq!(b.indicator_ids().len(), 1);
    }

    #[test]
    fn test_restore_rejects_malformed_tree() {
        let mut b = board();
        let err = b
            .create_note_from_json(r#"{"id": "x", "position": 3}"#)
            .expect_err("malformed");
        assert_eq!(err.kind, NoteErrorKind::Parse);
        assert!(b.note_ids().is_empty());
    }

    #[test]
    fn test_restore_without_id_gets_fresh_id() {
        let mut b = board();
        let id = b
            .create_note_from_json(r#"{"position": {"x": 5, "y": 6}, "size": {"width": 300, "height": 250}}"#)
            .expect("tree")
            .expect("note");
        assert!(id.starts_with("note_1000_"));
        let r = b.note(&id).expect("note").store.record().clone();
        assert_eq!(r.page_id, "page_1");
        assert_eq!(r.created_at, "t1000");
    }

    #[test]
    fn test_generated_ids_skip_restored_ones() {
        let mut b = board();
        let restored = b
            .create_note_from_json(r#"{"id": "note_1000_0", "position": {"x": 5, "y": 6}, "size": {"width": 300, "height": 250}}"#)
            .expect("tree")
            .expect("note");
        let created = b.create_note();
        let again = b.create_note_at_position(50.0, 50.0);

        assert_ne!(created, restored);
        assert_ne!(again, restored);
        assert_ne!(again, created);
        assert_eq!(b.note_ids().len(), 3);
    }

    #[test]
    fn test_restore_clamps_size_into_bounds() {
        let mut b = board();
        let id = b
            .create_note_from_json(r#"{"id": "big", "position": {"x": 5, "y": 6}, "size": {"width": 5000, "height": 10}}"#)
            .expect("tree")
            .expect("note");
        let n = b.note(&id).expect("note");
        assert_eq!(n.store.size(), Size::new(800.0, 250.0));
        assert_eq!(n.widget.size, Size::new(800.0, 250.0));
    }

    #[test]
    fn test_latest_created_or_clicked_is_on_top() {
        let mut b = board();
        let a = b.create_note();
        let c = b.create_note();
        let top = |b: &NoteBoard<TestHost>| {
            b.note_ids()
                .into_iter()
                .max_by_key(|id| b.note(id).map(|n| n.widget.z_index))
        };
        assert_eq!(top(&b), Some(c.clone()));
        assert_eq!(b.note(&a).map(|n| n.widget.z_index), Some(1000));

        assert!(b.bring_to_front(&a));
        assert_eq!(top(&b), Some(a.clone()));

        drag(&mut b, &c, (1.0, 1.0));
        assert_eq!(top(&b), Some(c));
    }

    #[test]
    fn test_show_after_hide_restores_record() {
        let mut b = board();
        let id = b.create_note_at_position(120.0, 80.0);
        b.update_note_data(&id, NoteField::Title("Keep".to_string()));
        b.commit_content(&id, "<i>body</i>".to_string());
        b.apply_color(&id, NoteColor::Pink);
        let before = b.note(&id).expect("note").store.record().clone();

        assert!(b.hide_note(&id));
        assert!(!b.hide_note(&id));
        assert!(b.show_note(&id));

        let n = b.note(&id).expect("note");
        assert_eq!(n.store.record(), &before);
        assert!(!n.widget.hidden);
        assert!(n.indicator.is_none());
        assert!(b.indicator_ids().is_empty());
    }

    #[test]
    fn test_hide_mid_drag_keeps_committed_position() {
        let mut b = board();
        let id = b.create_note_at_position(100.0, 100.0);
        let key = b
            .begin_drag(&id, HitRegion::DragHandle, Point::default())
            .expect("drag");
        b.track_pointer(&key, Point::new(60.0, 40.0));
        assert!(b.run_frame(&key));
        assert_eq!(b.note(&id).map(|n| n.widget.position), Some(Position::new(160.0, 140.0)));

        assert!(b.hide_note(&id));
        let n = b.note(&id).expect("note");
        assert_eq!(n.indicator.as_ref().map(|i| i.position), Some(Position::new(100.0, 100.0)));

        assert!(b.show_note(&id));
        let n = b.note(&id).expect("note");
        assert_eq!(n.widget.position, Position::new(100.0, 100.0));
        assert_eq!(n.store.position(), Position::new(100.0, 100.0));
    }

    #[test]
    fn test_hidden_flag_write_runs_transition() {
        let mut b = board();
        let id = b.create_note();
        assert!(b.update_note_data(&id, NoteField::Hidden(true)));
        assert_eq!(b.indicator_ids(), vec![id.clone()]);
        assert!(b.update_note_data(&id, NoteField::Hidden(false)));
        assert!(b.indicator_ids().is_empty());
    }

    #[test]
    fn test_indicator_drag_moves_note_position() {
        let mut b = board();
        let id = b.create_note_at_position(100.0, 100.0);
        b.hide_note(&id);
        assert!(b.begin_indicator_drag(&id, 2, Point::default()).is_none());

        let key = b
            .begin_indicator_drag(&id, 0, Point::new(0.0, 0.0))
            .expect("left button drags");
        b.track_pointer(&key, Point::new(5000.0, -5000.0));
        assert!(b.end_gesture(&key));

        let n = b.note(&id).expect("note");
        assert_eq!(n.indicator.as_ref().map(|i| i.position), Some(Position::new(974.0, 0.0)));
        assert_eq!(n.store.position(), Position::new(974.0, 0.0));

        b.show_note(&id);
        assert_eq!(b.note(&id).map(|n| n.widget.position), Some(Position::new(974.0, 0.0)));
    }

    #[test]
    fn test_remove_mid_drag_leaves_nothing_behind() {
        let mut b = board();
        let id = b.create_note_at_position(100.0, 100.0);
        let key = b
            .begin_drag(&id, HitRegion::DragHandle, Point::default())
            .expect("drag");
        b.track_pointer(&key, Point::new(30.0, 30.0));
        b.request_image_dialog(&id);
        b.request_color_dialog(&id);

        assert!(b.remove_note(&id));
        assert!(!b.track_pointer(&key, Point::new(40.0, 40.0)));
        assert!(!b.run_frame(&key));
        assert!(!b.end_gesture(&key));
        assert!(b.note_ids().is_empty());
        assert_eq!(b.image_target(), None);
        assert_eq!(b.color_target(), None);
        assert!(!b.remove_note(&id));
    }

    #[test]
    fn test_cancel_gestures_reports_running_sessions() {
        let mut b = board();
        let id = b.create_note_at_position(100.0, 100.0);
        let key = b
            .begin_resize(&id, HitRegion::ResizeHandle, Point::default())
            .expect("resize");
        assert_eq!(b.cancel_gestures(&id), vec![key.clone()]);
        assert!(b.cancel_gestures(&id).is_empty());
        assert!(!b.end_gesture(&key));
    }

    #[test]
    fn test_context_menu_single_and_actions() {
        let mut b = board();
        let visible = b.create_note();
        let one = b.create_note_from_data(&hidden_tree("note_a")).expect("t").expect("n");
        let two = b.create_note_from_data(&hidden_tree("note_b")).expect("t").expect("n");

        assert!(!b.open_context_menu(&visible, Point::default()));
        assert!(b.open_context_menu(&one, Point::new(5.0, 5.0)));
        assert!(b.open_context_menu(&two, Point::new(9.0, 9.0)));
        assert_eq!(b.context_menu().map(|m| m.note_id.as_str()), Some("note_b"));

        assert!(b.context_menu_action(MenuAction::Show));
        assert!(b.context_menu().is_none());
        assert!(!b.note(&two).expect("note").widget.hidden);

        assert!(b.open_context_menu(&one, Point::default()));
        assert!(b.context_menu_action(MenuAction::Delete));
        assert!(b.note(&one).is_none());
        assert!(!b.context_menu_action(MenuAction::Delete));

        b.hide_note(&visible);
        assert!(b.open_context_menu(&visible, Point::default()));
        assert!(b.dismiss_context_menu());
        assert!(!b.dismiss_context_menu());
    }

    #[test]
    fn test_line_break_commit_strips_inherited_format() {
        let mut b = board();
        let id = b.create_note();
        b.commit_content(&id, "<b>hello</b>".to_string());

        b.mark_line_break(&id);
        b.host_mut().now = 1_100;
        let fixed = b.commit_content(&id, "<b>hello</b><div><b><br></b></div>".to_string());
        assert_eq!(fixed.as_deref(), Some("<b>hello</b><div><br></div>"));
        assert_eq!(
            b.note(&id).map(|n| n.store.get(NoteKey::Content)),
            Some(crate::store::NoteValue::Text("<b>hello</b><div><br></div>".to_string()))
        );
    }

    #[test]
    fn test_line_break_keeps_formatting_after_the_caret() {
        let mut b = board();
        let id = b.create_note();
        b.commit_content(&id, "<b>a</b> plain <i>later</i>".to_string());

        b.mark_line_break(&id);
        let fixed = b.commit_content(
            &id,
            "<b>a</b><div><b><br></b></div> plain <i>later</i>".to_string(),
        );
        assert_eq!(
            fixed.as_deref(),
            Some("<b>a</b><div><br></div> plain <i>later</i>")
        );
        assert_eq!(
            b.note(&id).map(|n| n.store.content().to_string()),
            Some("<b>a</b><div><br></div> plain <i>later</i>".to_string())
        );
    }

    #[test]
    fn test_commit_outside_line_break_window_is_verbatim() {
        let mut b = board();
        let id = b.create_note();
        b.mark_line_break(&id);
        b.host_mut().now = 1_500;
        let raw = "<div><b><br></b></div>".to_string();
        assert_eq!(b.commit_content(&id, raw.clone()), None);
        assert_eq!(b.note(&id).map(|n| n.store.content().to_string()), Some(raw));
    }

    #[test]
    fn test_image_insertion_targets_dialog_note() {
        let mut b = board();
        let id = b.create_note();
        let url = ImageSource::Url("https://example.com/a.png".to_string());
        assert_eq!(b.insert_image(&url, None), None);

        b.commit_content(&id, "<div>hi</div>".to_string());
        assert!(b.request_image_dialog(&id));
        let (target, content) = b.insert_image(&url, None).expect("inserted");
        assert_eq!(target, id);
        assert!(content.starts_with("<div>hi</div><img src=\"https://example.com/a.png\""));
        assert!(content.ends_with("<br>"));

        assert_eq!(b.insert_image(&ImageSource::Url(" ".to_string()), None), None);
    }

    #[test]
    fn test_color_change_targets_dialog_note() {
        let mut b = board();
        let id = b.create_note();
        assert_eq!(b.change_note_background_color("bg-blue-200").ok(), Some(false));

        assert!(b.request_color_dialog(&id));
        assert_eq!(b.change_note_background_color("bg-blue-200").ok(), Some(true));
        assert_eq!(b.note(&id).map(|n| n.store.color()), Some(NoteColor::Blue));
        assert_eq!(
            b.serialize_note(&id).map(|t| t["backgroundColor"].clone()),
            Some(serde_json::json!("bg-blue-200"))
        );

        let err = b.change_note_background_color("bg-black").expect_err("unknown");
        assert_eq!(err.kind, NoteErrorKind::Parse);
        assert_eq!(b.note(&id).map(|n| n.store.color()), Some(NoteColor::Blue));
    }

    #[test]
    fn test_missing_targets_are_silent() {
        let mut b = board();
        assert!(!b.hide_note("nope"));
        assert!(!b.show_note("nope"));
        assert!(!b.bring_to_front("nope"));
        assert!(!b.update_note_data("nope", NoteField::Title("t".to_string())));
        assert!(!b.request_image_dialog("nope"));
        assert!(b.serialize_note("nope").is_none());
        assert!(b.begin_drag("nope", HitRegion::DragHandle, Point::default()).is_none());
        assert!(b.commit_content("nope", String::new()).is_none());
    }

    #[test]
    fn test_hit_region_chrome() {
        assert!(HitRegion::DragHandle.is_chrome());
        assert!(HitRegion::Chrome.is_chrome());
        assert!(!HitRegion::Content.is_chrome());
        assert!(!HitRegion::ResizeHandle.is_chrome());
    }

    #[test]
    fn test_pressing_editors_keeps_stacking() {
        let mut b = board();
        let a = b.create_note();
        let c = b.create_note();
        let z = |b: &NoteBoard<TestHost>, id: &str| b.note(id).map(|n| n.widget.z_index);
        let (za, zc) = (z(&b, &a), z(&b, &c));

        assert!(!b.press_note(&a, HitRegion::Content));
        assert_eq!((z(&b, &a), z(&b, &c)), (za, zc));

        assert!(b.press_note(&a, HitRegion::Chrome));
        assert!(z(&b, &a) > zc);
        assert!(b.press_note(&c, HitRegion::ResizeHandle));
        assert!(z(&b, &c) > z(&b, &a));
        assert!(!b.press_note("gone", HitRegion::Chrome));
    }
}
