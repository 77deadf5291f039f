use crate::components::ui::{NoteButton, NoteButtonSize, NoteButtonVariant};
use crate::engine::MenuAction;
use crate::state::BoardState;
use crate::util::px;
use icons::{Eye, Trash2};
use leptos::prelude::*;
use strum::IntoEnumIterator;

const MENU_Z_INDEX: i64 = 2_147_483_647;

#[component]
pub(crate) fn ContextMenuOverlay(state: BoardState) -> impl IntoView {
    let menu = Memo::new(move |_| state.board.with(|b| b.context_menu().cloned()));

    move || {
        menu.get().map(|m| {
            let style = format!(
                "left: {}; top: {}; z-index: {MENU_Z_INDEX};",
                px(m.anchor.x),
                px(m.anchor.y)
            );
            view! {
                <div
                    class="sticky-note-menu fixed min-w-32 rounded-md border bg-white py-1 shadow-lg"
                    style=style
                    on:contextmenu=|ev: web_sys::MouseEvent| ev.prevent_default()
                >
                    {MenuAction::iter()
                        .map(|action| {
                            let icon = match action {
                                MenuAction::Show => view! { <Eye /> }.into_any(),
                                MenuAction::Delete => view! { <Trash2 /> }.into_any(),
                            };
                            view! {
                                <NoteButton
                                    variant=NoteButtonVariant::Menu
                                    size=NoteButtonSize::Menu
                                    on:click=move |ev: web_sys::MouseEvent| {
                                        ev.stop_propagation();
                                        state.context_menu_action(action);
                                    }
                                >
                                    {icon}
                                    {action.label()}
                                </NoteButton>
                            }
                        })
                        .collect_view()}
                </div>
            }
        })
    }
}
