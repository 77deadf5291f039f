mod context_menu;
mod indicator_handle;
mod note_widget;
pub(crate) mod ui;

use crate::state::BoardState;
use context_menu::ContextMenuOverlay;
use indicator_handle::IndicatorHandle;
use leptos::prelude::*;
use note_widget::NoteWidget;

/// Everything the board renders: notes, indicators and the note menu.
#[component]
pub(crate) fn NoteLayer(state: BoardState) -> impl IntoView {
    let note_ids = move || state.board.with(|b| b.note_ids());
    let indicator_ids = move || state.board.with(|b| b.indicator_ids());

    view! {
        <div class="sticky-notes-layer">
            <For
                each=note_ids
                key=|id| id.clone()
                children=move |id| view! { <NoteWidget state=state id=id /> }
            />
            <For
                each=indicator_ids
                key=|id| id.clone()
                children=move |id| view! { <IndicatorHandle state=state id=id /> }
            />
            <ContextMenuOverlay state=state />
        </div>
    }
}
