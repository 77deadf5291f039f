mod api;
mod components;
mod config;
mod content;
mod engine;
mod error;
mod host;
mod models;
mod serializer;
mod state;
mod store;
mod util;

pub use api::StickyNotes;
pub use config::NotesConfig;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
// Nothing is mounted here: the host script creates `StickyNotes` when it
// wants a board.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
}
