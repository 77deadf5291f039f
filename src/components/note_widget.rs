use crate::components::ui::{NoteButton, NoteButtonSize, NoteButtonVariant, Separator};
use crate::engine::{restyle, ColorTarget, HitRegion, Point};
use crate::host::{caret_text_offset, exec_format_command, place_caret_at_text_offset, CONTENT_CLASS};
use crate::models::{FormatCommand, NoteId};
use crate::state::BoardState;
use crate::util::px;
use icons::{Bold, EyeOff, Image, Italic, Palette, Underline, X};
use leptos::html;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

// Positions are page coordinates, so the note scrolls with the page.
const NOTE_CLASS: &str =
    "sticky-note absolute flex flex-col rounded-lg border shadow-lg overflow-hidden text-gray-900";
const TOOLBAR_CLASS: &str =
    "sticky-note-toolbar flex items-center gap-1 px-2 py-1 border-b cursor-move select-none";
const RESIZE_CLASS: &str = "sticky-note-resize";

mod parts {
    use super::*;
    clx! {ToolbarGroup, div, "flex items-center gap-0.5"}
}

use parts::*;

/// Which part of the note a pointer event landed on.
fn hit_region(ev: &web_sys::MouseEvent) -> HitRegion {
    let Some(el) = ev
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
    else {
        return HitRegion::Chrome;
    };
    let within = |selector: &str| el.closest(selector).ok().flatten().is_some();

    if within(&format!(".{RESIZE_CLASS}")) {
        HitRegion::ResizeHandle
    } else if within("button, input, [contenteditable]") {
        HitRegion::Content
    } else if within(".sticky-note-toolbar") {
        HitRegion::DragHandle
    } else {
        HitRegion::Chrome
    }
}

fn pointer(ev: &web_sys::MouseEvent) -> Point {
    Point::new(ev.client_x() as f64, ev.client_y() as f64)
}

#[component]
pub(crate) fn NoteWidget(state: BoardState, id: NoteId) -> impl IntoView {
    let id = StoredValue::new(id);

    let widget = Memo::new(move |_| {
        id.with_value(|id| state.board.with(|b| b.note(id).map(|n| n.widget.clone())))
    });
    let color = Memo::new(move |_| {
        id.with_value(|id| {
            state
                .board
                .with(|b| b.note(id).map(|n| n.store.color()).unwrap_or_default())
        })
    });

    // Editors own their text after the first render.
    let (initial_title, initial_content) = id.with_value(|id| {
        state.board.with_untracked(|b| {
            b.note(id)
                .map(|n| {
                    let r = n.store.record();
                    (r.title.clone(), r.content.clone())
                })
                .unwrap_or_default()
        })
    });
    let initial_content = StoredValue::new(initial_content);

    let content_ref: NodeRef<html::Div> = NodeRef::new();
    Effect::new(move |_| {
        if let Some(el) = content_ref.get() {
            initial_content.with_value(|c| el.set_inner_html(c));
        }
    });

    let dragging = Memo::new(move |_| {
        id.with_value(|id| state.board.with(|b| b.note(id).is_some_and(|n| n.is_dragging())))
    });

    let root_class = move || {
        let hidden = widget.get().map(|w| w.hidden).unwrap_or(true);
        tw_merge!(
            restyle(NOTE_CLASS, color.get(), ColorTarget::Note),
            if dragging.get() { "opacity-90 shadow-2xl" } else { "" },
            if hidden { "hidden" } else { "" }
        )
    };
    let toolbar_class = move || restyle(TOOLBAR_CLASS, color.get(), ColorTarget::Toolbar);
    let root_style = move || {
        widget
            .get()
            .map(|w| {
                format!(
                    "left: {}; top: {}; width: {}; height: {}; z-index: {};",
                    px(w.position.x),
                    px(w.position.y),
                    px(w.size.width),
                    px(w.size.height),
                    w.z_index
                )
            })
            .unwrap_or_default()
    };

    let on_mousedown = move |ev: web_sys::MouseEvent| {
        let id = id.get_value();
        match hit_region(&ev) {
            HitRegion::DragHandle => {
                ev.prevent_default();
                state.begin_drag(&id, HitRegion::DragHandle, pointer(&ev));
            }
            HitRegion::ResizeHandle => {
                ev.prevent_default();
                state.press_note(&id, HitRegion::ResizeHandle);
                state.begin_resize(&id, pointer(&ev));
            }
            region => state.press_note(&id, region),
        }
    };

    let on_dblclick = move |ev: web_sys::MouseEvent| {
        if hit_region(&ev).is_chrome() {
            state.remove_note(&id.get_value());
        }
    };

    let format = move |command: FormatCommand| {
        move |_ev: web_sys::MouseEvent| {
            exec_format_command(command);
            if let Some(el) = content_ref.get_untracked() {
                let _ = el.focus();
            }
        }
    };
    // Keep the editor selection while a toolbar button is pressed.
    let keep_selection = |ev: web_sys::MouseEvent| ev.prevent_default();

    let on_title_input = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            state.commit_title(&id.get_value(), input.value());
        }
    };

    let on_content_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            state.mark_line_break(&id.get_value());
        }
    };

    let on_content_input = move |_ev: web_sys::Event| {
        let Some(el) = content_ref.get_untracked() else {
            return;
        };
        let caret = caret_text_offset(&el);
        if let Some(normalized) = state.commit_content(&id.get_value(), el.inner_html()) {
            el.set_inner_html(&normalized);
            if let Some(at) = caret {
                place_caret_at_text_offset(&el, at);
            }
        }
    };

    view! {
        <div
            class=root_class
            style=root_style
            data-note-id=id.get_value()
            on:mousedown=on_mousedown
            on:dblclick=on_dblclick
        >
            <div class=toolbar_class>
                <ToolbarGroup>
                    <NoteButton attr:title="Bold" on:mousedown=keep_selection on:click=format(FormatCommand::Bold)>
                        <Bold />
                    </NoteButton>
                    <NoteButton attr:title="Italic" on:mousedown=keep_selection on:click=format(FormatCommand::Italic)>
                        <Italic />
                    </NoteButton>
                    <NoteButton attr:title="Underline" on:mousedown=keep_selection on:click=format(FormatCommand::Underline)>
                        <Underline />
                    </NoteButton>
                </ToolbarGroup>
                <Separator />
                <ToolbarGroup>
                    <NoteButton
                        attr:title="Insert image"
                        on:mousedown=keep_selection
                        on:click=move |_| state.request_image_dialog(&id.get_value())
                    >
                        <Image />
                    </NoteButton>
                    <NoteButton
                        attr:title="Background color"
                        on:click=move |_| state.request_color_dialog(&id.get_value())
                    >
                        <Palette />
                    </NoteButton>
                </ToolbarGroup>
                <div class="flex-1 h-6"></div>
                <ToolbarGroup>
                    <NoteButton attr:title="Hide" on:click=move |_| { state.hide_note(&id.get_value()); }>
                        <EyeOff />
                    </NoteButton>
                    <NoteButton
                        variant=NoteButtonVariant::Danger
                        size=NoteButtonSize::Default
                        attr:title="Delete"
                        on:click=move |_| { state.remove_note(&id.get_value()); }
                    >
                        <X />
                    </NoteButton>
                </ToolbarGroup>
            </div>

            <input
                class="sticky-note-title w-full bg-transparent px-3 pt-2 pb-1 text-sm font-semibold outline-none placeholder:text-gray-500"
                type="text"
                placeholder="Title"
                prop:value=initial_title
                on:input=on_title_input
            />
            <div
                node_ref=content_ref
                class=format!("{CONTENT_CLASS} flex-1 overflow-auto px-3 pb-3 text-sm outline-none")
                contenteditable="true"
                on:keydown=on_content_keydown
                on:input=on_content_input
            ></div>

            <div class=format!("{RESIZE_CLASS} absolute bottom-0 right-0 size-3 cursor-se-resize")></div>
        </div>
    }
}
