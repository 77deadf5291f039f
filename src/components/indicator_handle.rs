use crate::engine::Point;
use crate::models::NoteId;
use crate::state::BoardState;
use crate::util::px;
use icons::EyeOff;
use leptos::prelude::*;

// Page-relative, like the drag bounds.
const INDICATOR_CLASS: &str = "hidden-note-indicator absolute flex size-8 items-center justify-center rounded-full border shadow-md cursor-move select-none";

/// Draggable stand-in for a hidden note. Right-click opens the note menu.
#[component]
pub(crate) fn IndicatorHandle(state: BoardState, id: NoteId) -> impl IntoView {
    let id = StoredValue::new(id);

    let placement = Memo::new(move |_| {
        id.with_value(|id| {
            state.board.with(|b| {
                b.note(id).and_then(|n| {
                    n.indicator
                        .as_ref()
                        .map(|i| (i.position, n.widget.z_index, n.store.color()))
                })
            })
        })
    });
    let title = id.with_value(|id| {
        state.board.with_untracked(|b| {
            b.note(id)
                .map(|n| n.store.record().title.clone())
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Hidden note".to_string())
        })
    });

    let style = move || {
        placement
            .get()
            .map(|(p, z, _)| format!("left: {}; top: {}; z-index: {z};", px(p.x), px(p.y)))
            .unwrap_or_default()
    };
    let class = move || {
        let color = placement.get().map(|(_, _, c)| c).unwrap_or_default();
        format!(
            "{INDICATOR_CLASS} {} {}",
            color.background_class(),
            color.border_class()
        )
    };

    let on_mousedown = move |ev: web_sys::MouseEvent| {
        let at = Point::new(ev.client_x() as f64, ev.client_y() as f64);
        if ev.button() == 0 {
            ev.prevent_default();
        }
        state.begin_indicator_drag(&id.get_value(), ev.button(), at);
    };

    let on_contextmenu = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        let at = Point::new(ev.client_x() as f64, ev.client_y() as f64);
        state.open_context_menu(&id.get_value(), at);
    };

    view! {
        <div
            class=class
            style=style
            title=title
            data-indicator-for=id.get_value()
            on:mousedown=on_mousedown
            on:contextmenu=on_contextmenu
        >
            <EyeOff class="size-4 text-gray-700" />
        </div>
    }
}
