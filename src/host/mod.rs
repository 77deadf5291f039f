//! Browser side of the engine: viewport and clock queries, the formatting
//! delegate, dialog notifications and image loading.

use crate::engine::{Host, Viewport};
use crate::error::NoteError;
use crate::models::FormatCommand;
use crate::util::{generate_page_id, now_iso, now_ms, random_unit};
use leptos::logging::warn;
use strum::AsRefStr;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

pub(crate) const CONTENT_CLASS: &str = "sticky-note-content";

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct BrowserHost;

impl Host for BrowserHost {
    fn viewport(&self) -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::default();
        };
        let (width, height) = window
            .document()
            .and_then(|d| d.document_element())
            .map(|el| (el.client_width() as f64, el.client_height() as f64))
            .unwrap_or_default();
        Viewport {
            width,
            height,
            scroll_x: window.page_x_offset().unwrap_or(0.0),
            scroll_y: window.page_y_offset().unwrap_or(0.0),
        }
    }

    fn now_ms(&self) -> i64 {
        now_ms()
    }

    fn now_iso(&self) -> String {
        now_iso()
    }

    fn random_unit(&self) -> f64 {
        random_unit()
    }
}

/// Page id for this document: location, markup and load time hashed together.
pub(crate) fn current_page_id() -> String {
    let window = web_sys::window();
    let href = window
        .as_ref()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default();
    let markup = window
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .map(|el| el.outer_html())
        .unwrap_or_default();
    generate_page_id(&href, &markup, now_ms())
}

/// Hand a toolbar command to the document's editing machinery.
pub(crate) fn exec_format_command(command: FormatCommand) {
    let Some(doc) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
    else {
        return;
    };
    let _ = doc.exec_command(command.as_ref());
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
pub(crate) enum DialogRequest {
    #[strum(serialize = "stickynote:image-dialog")]
    Image,
    #[strum(serialize = "stickynote:color-dialog")]
    Color,
}

/// Tell whoever owns the dialogs which note asked for one.
pub(crate) fn dispatch_dialog_request(request: DialogRequest, note_id: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let init = web_sys::CustomEventInit::new();
    init.set_detail(&JsValue::from_str(note_id));
    if let Ok(event) = web_sys::CustomEvent::new_with_event_init_dict(request.as_ref(), &init) {
        let _ = window.dispatch_event(&event);
    }
}

pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Load `src` off-screen and run `on_load` once it decoded. A failure is
/// reported to the user and the element is dropped.
pub(crate) fn preload_image(src: &str, on_load: impl FnOnce() + 'static) {
    let Ok(img) = web_sys::HtmlImageElement::new() else {
        return;
    };

    let onload = Closure::once_into_js(on_load);
    img.set_onload(Some(onload.unchecked_ref()));

    let failed = src.to_string();
    let img_for_error = img.clone();
    let onerror = Closure::once_into_js(move || {
        let err = NoteError::image_load(&failed);
        warn!("{err}");
        alert(&err.to_string());
        img_for_error.set_onload(None);
        img_for_error.remove();
    });
    img.set_onerror(Some(onerror.unchecked_ref()));

    img.set_src(src);
}

/// Read a local file into a `data:` URL.
pub(crate) fn read_file_as_data_url(file: web_sys::File, on_read: impl FnOnce(String, String) + 'static) {
    let Ok(reader) = web_sys::FileReader::new() else {
        return;
    };
    let name = file.name();
    let reader_for_load = reader.clone();
    let onload = Closure::once_into_js(move || {
        if let Some(data_url) = reader_for_load.result().ok().and_then(|v| v.as_string()) {
            on_read(name, data_url);
        }
    });
    reader.set_onload(Some(onload.unchecked_ref()));
    if reader.read_as_data_url(&file).is_err() {
        warn!("{}", NoteError::image_load("local file"));
    }
}

fn content_element(note_id: &str) -> Option<web_sys::HtmlElement> {
    let doc = web_sys::window()?.document()?;
    let selector = format!(r#"[data-note-id="{note_id}"] .{CONTENT_CLASS}"#);
    doc.query_selector(&selector)
        .ok()
        .flatten()?
        .dyn_into::<web_sys::HtmlElement>()
        .ok()
}

/// The live selection range when its caret sits inside `el`.
fn caret_range_inside(el: &web_sys::HtmlElement) -> Option<web_sys::Range> {
    let selection = web_sys::window()?.get_selection().ok()??;
    if selection.range_count() == 0 {
        return None;
    }
    let range = selection.get_range_at(0).ok()?;
    let container = range.common_ancestor_container().ok()?;
    el.contains(Some(&container)).then_some(range)
}

/// Insert image markup at the caret of a note's content region.
///
/// Returns the region's markup after the insertion, or `None` when the
/// caret is elsewhere and the caller should append instead.
pub(crate) fn insert_image_at_caret(note_id: &str, src: &str, alt: &str, style: &str) -> Option<String> {
    let el = content_element(note_id)?;
    let range = caret_range_inside(&el)?;
    let doc = web_sys::window()?.document()?;

    let img = doc.create_element("img").ok()?;
    img.set_attribute("src", src).ok()?;
    img.set_attribute("alt", alt).ok()?;
    img.set_attribute("style", style).ok()?;
    let br = doc.create_element("br").ok()?;

    range.delete_contents().ok()?;
    // Each insert goes to the range start, so the break goes in first.
    range.insert_node(&br).ok()?;
    range.insert_node(&img).ok()?;
    range.set_start_after(&br).ok()?;
    range.collapse_with_to_start(true);

    Some(el.inner_html())
}

/// Caret position inside `el`, counted in UTF-16 text units before it.
pub(crate) fn caret_text_offset(el: &web_sys::HtmlElement) -> Option<u32> {
    let caret = caret_range_inside(el)?;
    let doc = web_sys::window()?.document()?;
    let before = doc.create_range().ok()?;
    before.select_node_contents(el).ok()?;
    before
        .set_end(&caret.end_container().ok()?, caret.end_offset().ok()?)
        .ok()?;
    Some(before.to_string().length())
}

/// Put a collapsed caret `offset` text units into `el`, or at its end when
/// the text is shorter.
pub(crate) fn place_caret_at_text_offset(el: &web_sys::HtmlElement, offset: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let (Some(doc), Ok(Some(selection))) = (window.document(), window.get_selection()) else {
        return;
    };
    let Ok(range) = doc.create_range() else {
        return;
    };

    let root: &web_sys::Node = el;
    let mut remaining = offset;
    let mut node = root.first_child();
    let mut placed = false;
    while let Some(n) = node {
        if n.node_type() == web_sys::Node::TEXT_NODE {
            let len = n
                .text_content()
                .map(|t| t.encode_utf16().count() as u32)
                .unwrap_or(0);
            if remaining <= len {
                placed = range.set_start(&n, remaining).is_ok();
                break;
            }
            remaining -= len;
        }
        node = next_in_document_order(&n, root);
    }

    if placed {
        range.collapse_with_to_start(true);
    } else {
        if range.select_node_contents(el).is_err() {
            return;
        }
        range.collapse_with_to_start(false);
    }
    let _ = selection.remove_all_ranges();
    let _ = selection.add_range(&range);
}

fn next_in_document_order(node: &web_sys::Node, root: &web_sys::Node) -> Option<web_sys::Node> {
    if let Some(child) = node.first_child() {
        return Some(child);
    }
    let mut cur = node.clone();
    loop {
        if root.is_same_node(Some(&cur)) {
            return None;
        }
        if let Some(next) = cur.next_sibling() {
            return Some(next);
        }
        cur = cur.parent_node()?;
    }
}

/// Replace a note's rendered content markup.
pub(crate) fn set_content_markup(note_id: &str, markup: &str) {
    if let Some(el) = content_element(note_id) {
        el.set_inner_html(markup);
    }
}
