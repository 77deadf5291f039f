//! JavaScript-facing surface used by the persistence side and the dialogs.

use crate::components::NoteLayer;
use crate::config::NotesConfig;
use crate::engine::{report_restore_error, ImageSource};
use crate::error::NoteError;
use crate::host::read_file_as_data_url;
use crate::serializer::{self, NoteTree};
use crate::state::BoardState;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

fn to_js(e: NoteError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One board of sticky notes mounted over the current page.
#[wasm_bindgen]
pub struct StickyNotes {
    state: BoardState,
    _owner: Owner,
}

#[wasm_bindgen]
impl StickyNotes {
    /// Mount the note layer. Settings come from `window.STICKY_NOTES`.
    #[wasm_bindgen(constructor)]
    pub fn new() -> StickyNotes {
        let config = NotesConfig::from_env();
        let owner = Owner::new();
        let state = owner.with(|| {
            let state = BoardState::new(&config);
            mount_to_body(move || view! { <NoteLayer state=state /> });
            state
        });
        StickyNotes {
            state,
            _owner: owner,
        }
    }

    #[wasm_bindgen(js_name = createNote)]
    pub fn create_note(&self) -> String {
        self.state.create_note()
    }

    /// Non-positive coordinates fall back to random placement.
    #[wasm_bindgen(js_name = createNotebyPosition)]
    pub fn create_note_by_position(&self, x: f64, y: f64) -> String {
        self.state.create_note_at_position(x, y)
    }

    /// Restore a note from its JSON tree. Resolves to the note id, or
    /// `undefined` when that note is already open.
    #[wasm_bindgen(js_name = createNoteFromData)]
    pub fn create_note_from_data(&self, json: &str) -> Result<Option<String>, JsValue> {
        let tree: NoteTree = serializer::parse_tree(json)
            .inspect_err(report_restore_error)
            .map_err(to_js)?;
        self.state
            .create_note_from_data(&tree)
            .inspect_err(report_restore_error)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = serializeNote)]
    pub fn serialize_note(&self, id: &str) -> Option<String> {
        self.state.serialize_note(id).map(|tree| tree.to_string())
    }

    #[wasm_bindgen(js_name = getAllNoteStickies)]
    pub fn get_all_note_stickies(&self) -> Vec<String> {
        self.state.note_ids()
    }

    #[wasm_bindgen(js_name = hideNote)]
    pub fn hide_note(&self, id: &str) -> bool {
        self.state.hide_note(id)
    }

    #[wasm_bindgen(js_name = showNote)]
    pub fn show_note(&self, id: &str) -> bool {
        self.state.show_note(id)
    }

    #[wasm_bindgen(js_name = removeNote)]
    pub fn remove_note(&self, id: &str) -> bool {
        self.state.remove_note(id)
    }

    /// Insert into the note whose image button was pressed last.
    #[wasm_bindgen(js_name = insertImageFromUrl)]
    pub fn insert_image_from_url(&self, url: &str) {
        self.state.insert_image(ImageSource::Url(url.to_string()));
    }

    #[wasm_bindgen(js_name = insertImageFromFile)]
    pub fn insert_image_from_file(&self, file: web_sys::File) {
        let state = self.state;
        read_file_as_data_url(file, move |name, data_url| {
            state.insert_image(ImageSource::Payload { name, data_url });
        });
    }

    /// Apply one of the ten `bg-*-200` tokens to the note whose color
    /// button was pressed last.
    #[wasm_bindgen(js_name = changeNoteBackgroundColor)]
    pub fn change_note_background_color(&self, token: &str) -> Result<bool, JsValue> {
        self.state.change_note_background_color(token).map_err(to_js)
    }
}

impl Default for StickyNotes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const TREE: &str = r#"{
        "id": "note_1700000000000_0",
        "pageId": "page_1",
        "title": "Saved",
        "content": "<b>hi</b>",
        "position": {"x": 40, "y": 60},
        "size": {"width": 320, "height": 260},
        "isHidden": false,
        "backgroundColor": "bg-blue-200",
        "createdAt": "2026-10-19T08:00:00.000Z"
    }"#;

    #[wasm_bindgen_test]
    fn test_restore_is_idempotent_and_serializes_back() {
        let notes = StickyNotes::new();
        let id = notes
            .create_note_from_data(TREE)
            .expect("valid tree")
            .expect("new note");
        assert_eq!(notes.create_note_from_data(TREE).expect("valid tree"), None);
        assert_eq!(notes.get_all_note_stickies(), vec![id.clone()]);

        let json = notes.serialize_note(&id).expect("open note");
        let tree: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(tree["title"], "Saved");
        assert_eq!(tree["backgroundColor"], "bg-blue-200");

        assert!(notes.remove_note(&id));
        assert!(notes.get_all_note_stickies().is_empty());
    }

    #[wasm_bindgen_test]
    fn test_bad_inputs_surface_as_errors() {
        let notes = StickyNotes::new();
        assert!(notes.create_note_from_data("{not json").is_err());
        assert!(notes.change_note_background_color("bg-black").is_err());
        // Valid token, no dialog target.
        assert_eq!(notes.change_note_background_color("bg-red-200").ok(), Some(false));
    }

    #[wasm_bindgen_test]
    fn test_hide_show_via_facade() {
        let notes = StickyNotes::new();
        let id = notes.create_note_by_position(100.0, 120.0);
        assert!(notes.hide_note(&id));
        let doc = web_sys::window().and_then(|w| w.document()).expect("document");
        let selector = format!(r#"[data-indicator-for="{id}"]"#);
        assert!(notes.show_note(&id));
        assert!(notes.remove_note(&id));
        assert!(doc.query_selector(&selector).ok().flatten().is_none());
    }
}
