use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_BASE_Z_INDEX: i64 = 1000;
pub(crate) const DEFAULT_LINE_BREAK_WINDOW_MS: i64 = 200;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NotesConfig {
    /// Page the notes belong to. Generated from the document when absent.
    pub page_id: Option<String>,
    /// Stacking order handed to the first note.
    pub base_z_index: i64,
    pub line_break_window_ms: i64,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            page_id: None,
            base_z_index: DEFAULT_BASE_Z_INDEX,
            line_break_window_ms: DEFAULT_LINE_BREAK_WINDOW_MS,
        }
    }
}

impl NotesConfig {
    /// Read overrides from `window.STICKY_NOTES`.
    ///
    /// Both `PAGE_ID` and `page_id` spellings are accepted (upper case wins),
    /// likewise `BASE_Z_INDEX` / `base_z_index`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let Some(window) = web_sys::window() else {
            return config;
        };
        let Some(env) = window.get("STICKY_NOTES") else {
            return config;
        };
        if env.is_undefined() || !env.is_object() {
            return config;
        }

        let read = |keys: [&str; 2]| {
            keys.iter().find_map(|k| {
                js_sys::Reflect::get(&env, &(*k).into())
                    .ok()
                    .filter(|v| !v.is_undefined() && !v.is_null())
            })
        };

        if let Some(page_id) = read(["PAGE_ID", "page_id"]).and_then(|v| v.as_string()) {
            if !page_id.trim().is_empty() {
                config.page_id = Some(page_id);
            }
        }
        if let Some(z) = read(["BASE_Z_INDEX", "base_z_index"]).and_then(|v| v.as_f64()) {
            config.base_z_index = z as i64;
        }

        config
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_from_env_reads_window_overrides() {
        let window = web_sys::window().expect("window");
        let env = js_sys::Object::new();
        js_sys::Reflect::set(&env, &"page_id".into(), &"page_7".into()).expect("set page_id");
        js_sys::Reflect::set(&env, &"BASE_Z_INDEX".into(), &5000.into()).expect("set z");
        js_sys::Reflect::set(&window, &"STICKY_NOTES".into(), &env).expect("set env");

        let c = NotesConfig::from_env();
        assert_eq!(c.page_id.as_deref(), Some("page_7"));
        assert_eq!(c.base_z_index, 5000);

        js_sys::Reflect::delete_property(&window, &"STICKY_NOTES".into()).expect("cleanup");
        assert_eq!(NotesConfig::from_env(), NotesConfig::default());
    }
}
