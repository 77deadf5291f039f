use crate::config::NotesConfig;
use crate::engine::{
    GestureKey, HitRegion, ImageSource, MenuAction, NoteBoard, NormalizedImage, Point, IMAGE_STYLE,
};
use crate::error::NoteResult;
use crate::host::{
    current_page_id, dispatch_dialog_request, insert_image_at_caret, preload_image,
    set_content_markup, BrowserHost, DialogRequest,
};
use crate::models::NoteId;
use crate::serializer::NoteTree;
use crate::store::NoteField;
use leptos::ev;
use leptos::logging::log;
use leptos::prelude::*;
use leptos_dom::helpers::{
    request_animation_frame_with_handle, AnimationFrameRequestHandle, WindowListenerHandle,
};
use std::collections::HashMap;

/// Window listeners and the pending frame of one pointer gesture.
struct PointerSession {
    on_move: WindowListenerHandle,
    on_up: WindowListenerHandle,
    frame: Option<AnimationFrameRequestHandle>,
}

impl PointerSession {
    fn dispose(self) {
        self.on_move.remove();
        self.on_up.remove();
        if let Some(frame) = self.frame {
            frame.cancel();
        }
    }
}

/// Reactive wrapper around the board.
///
/// Views read `board`; pointer gestures own their listeners through
/// `sessions` so removing a note can tear them down.
#[derive(Clone, Copy)]
pub(crate) struct BoardState {
    pub board: RwSignal<NoteBoard<BrowserHost>>,
    sessions: StoredValue<HashMap<GestureKey, PointerSession>>,

    /// Global listeners (keep handles alive).
    _listeners: StoredValue<Vec<WindowListenerHandle>>,
}

impl BoardState {
    pub fn new(config: &NotesConfig) -> Self {
        let page_id = config.page_id.clone().unwrap_or_else(current_page_id);
        let s = Self {
            board: RwSignal::new(NoteBoard::new(BrowserHost, page_id, config)),
            sessions: StoredValue::new(HashMap::new()),
            _listeners: StoredValue::new(Vec::new()),
        };
        s.start_global_listeners();
        s
    }

    fn start_global_listeners(self) {
        let resize = window_event_listener(ev::resize, move |_ev: web_sys::UiEvent| {
            self.board.maybe_update(|b| b.on_viewport_resize());
        });
        // Any click outside the menu closes it; menu items stop propagation.
        let click = window_event_listener(ev::click, move |_ev: web_sys::MouseEvent| {
            self.board.maybe_update(|b| b.dismiss_context_menu());
        });
        self._listeners.set_value(vec![resize, click]);
    }

    // ---- notes ----

    pub fn create_note(self) -> NoteId {
        self.board.try_update(|b| b.create_note()).unwrap_or_default()
    }

    pub fn create_note_at_position(self, x: f64, y: f64) -> NoteId {
        self.board
            .try_update(|b| b.create_note_at_position(x, y))
            .unwrap_or_default()
    }

    pub fn create_note_from_data(self, tree: &NoteTree) -> NoteResult<Option<NoteId>> {
        self.board
            .try_update(|b| b.create_note_from_data(tree))
            .unwrap_or(Ok(None))
    }

    pub fn serialize_note(self, id: &str) -> Option<NoteTree> {
        self.board.with_untracked(|b| b.serialize_note(id))
    }

    pub fn note_ids(self) -> Vec<NoteId> {
        self.board.with_untracked(|b| b.note_ids())
    }

    pub fn hide_note(self, id: &str) -> bool {
        self.dispose_note_sessions(id);
        self.board.try_update(|b| b.hide_note(id)).unwrap_or(false)
    }

    pub fn show_note(self, id: &str) -> bool {
        self.dispose_note_sessions(id);
        self.board.try_update(|b| b.show_note(id)).unwrap_or(false)
    }

    pub fn remove_note(self, id: &str) -> bool {
        self.dispose_note_sessions(id);
        self.board.try_update(|b| b.remove_note(id)).unwrap_or(false)
    }

    pub fn press_note(self, id: &str, region: HitRegion) {
        self.board.maybe_update(|b| b.press_note(id, region));
    }

    /// Typing must not re-render the editor it types into.
    pub fn commit_title(self, id: &str, title: String) {
        self.board
            .try_update_untracked(|b| b.update_note_data(id, NoteField::Title(title)));
    }

    /// Returns normalized markup the editor should show instead of its own.
    pub fn commit_content(self, id: &str, content: String) -> Option<String> {
        self.board
            .try_update_untracked(|b| b.commit_content(id, content))
            .flatten()
    }

    pub fn mark_line_break(self, id: &str) {
        self.board.try_update_untracked(|b| b.mark_line_break(id));
    }

    // ---- pointer gestures ----

    pub fn begin_drag(self, id: &str, region: HitRegion, pointer: Point) {
        if let Some(key) = self.board.try_update(|b| b.begin_drag(id, region, pointer)).flatten() {
            self.start_session(key);
        }
    }

    pub fn begin_resize(self, id: &str, pointer: Point) {
        let key = self
            .board
            .try_update_untracked(|b| b.begin_resize(id, HitRegion::ResizeHandle, pointer))
            .flatten();
        if let Some(key) = key {
            self.start_session(key);
        }
    }

    pub fn begin_indicator_drag(self, id: &str, button: i16, pointer: Point) {
        let key = self
            .board
            .try_update_untracked(|b| b.begin_indicator_drag(id, button, pointer))
            .flatten();
        if let Some(key) = key {
            self.start_session(key);
        }
    }

    fn start_session(self, key: GestureKey) {
        self.end_session(&key);

        let move_key = key.clone();
        let on_move = window_event_listener(ev::mousemove, move |ev: web_sys::MouseEvent| {
            self.on_pointer_move(&move_key, Point::new(ev.client_x() as f64, ev.client_y() as f64));
        });

        let up_key = key.clone();
        let on_up = window_event_listener(ev::mouseup, move |_ev: web_sys::MouseEvent| {
            self.finish_gesture(&up_key);
        });

        self.sessions.update_value(|m| {
            m.insert(
                key,
                PointerSession {
                    on_move,
                    on_up,
                    frame: None,
                },
            );
        });
    }

    fn on_pointer_move(self, key: &GestureKey, pointer: Point) {
        let needs_frame = self
            .board
            .try_update_untracked(|b| b.track_pointer(key, pointer))
            .unwrap_or(false);
        if !needs_frame {
            return;
        }

        let frame_key = key.clone();
        let Ok(handle) = request_animation_frame_with_handle(move || self.run_frame(&frame_key)) else {
            return;
        };
        self.sessions.update_value(|m| match m.get_mut(key) {
            Some(session) => {
                // A newer move supersedes the frame still waiting.
                if let Some(prev) = session.frame.replace(handle) {
                    prev.cancel();
                }
            }
            None => handle.cancel(),
        });
    }

    fn run_frame(self, key: &GestureKey) {
        self.sessions.update_value(|m| {
            if let Some(session) = m.get_mut(key) {
                session.frame = None;
            }
        });
        self.board.maybe_update(|b| b.run_frame(key));
    }

    fn finish_gesture(self, key: &GestureKey) {
        self.end_session(key);
        self.board.maybe_update(|b| b.end_gesture(key));
    }

    fn end_session(self, key: &GestureKey) {
        let session = self
            .sessions
            .try_update_value(|m| m.remove(key))
            .flatten();
        if let Some(session) = session {
            session.dispose();
        }
    }

    /// Stop every gesture of a note before it changes shape or goes away.
    fn dispose_note_sessions(self, id: &str) {
        self.board.try_update_untracked(|b| b.cancel_gestures(id));
        let sessions: Vec<PointerSession> = self
            .sessions
            .try_update_value(|m| {
                let keys: Vec<GestureKey> = m.keys().filter(|k| k.note_id == id).cloned().collect();
                keys.iter().filter_map(|k| m.remove(k)).collect()
            })
            .unwrap_or_default();
        for session in sessions {
            session.dispose();
        }
    }

    // ---- context menu ----

    pub fn open_context_menu(self, id: &str, anchor: Point) {
        self.board.maybe_update(|b| b.open_context_menu(id, anchor));
    }

    pub fn context_menu_action(self, action: MenuAction) {
        let target = self
            .board
            .with_untracked(|b| b.context_menu().map(|m| m.note_id.clone()));
        if let Some(id) = target {
            self.dispose_note_sessions(&id);
        }
        self.board.maybe_update(|b| b.context_menu_action(action));
    }

    // ---- dialogs ----

    pub fn request_image_dialog(self, id: &str) {
        let ok = self
            .board
            .try_update_untracked(|b| b.request_image_dialog(id))
            .unwrap_or(false);
        if ok {
            dispatch_dialog_request(DialogRequest::Image, id);
        }
    }

    pub fn request_color_dialog(self, id: &str) {
        let ok = self
            .board
            .try_update_untracked(|b| b.request_color_dialog(id))
            .unwrap_or(false);
        if ok {
            dispatch_dialog_request(DialogRequest::Color, id);
        }
    }

    /// Load the image, then put it at the caret if the caret is in the
    /// target note, or at the end of its content otherwise.
    pub fn insert_image(self, source: ImageSource) {
        let Some(image) = NormalizedImage::from_source(&source) else {
            return;
        };
        if self.board.with_untracked(|b| b.image_target().is_none()) {
            log!("image dropped: no note asked for one");
            return;
        }
        let src = image.src.clone();
        preload_image(&src, move || self.place_loaded_image(source, image));
    }

    fn place_loaded_image(self, source: ImageSource, image: NormalizedImage) {
        let Some(id) = self.board.with_untracked(|b| b.image_target().map(str::to_string)) else {
            return;
        };

        if let Some(markup) = insert_image_at_caret(&id, &image.src, &image.alt, IMAGE_STYLE) {
            self.board
                .try_update_untracked(|b| b.update_note_data(&id, NoteField::Content(markup)));
            return;
        }

        let inserted = self
            .board
            .try_update_untracked(|b| b.insert_image(&source, None))
            .flatten();
        if let Some((id, content)) = inserted {
            set_content_markup(&id, &content);
        }
    }

    pub fn change_note_background_color(self, token: &str) -> NoteResult<bool> {
        self.board
            .try_update(|b| b.change_note_background_color(token))
            .unwrap_or(Ok(false))
    }
}
