use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    NoteButton {
        base: "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded text-sm transition-colors disabled:pointer-events-none disabled:opacity-50 [&_svg]:pointer-events-none [&_svg:not([class*='size-'])]:size-4 shrink-0 [&_svg]:shrink-0 outline-none hover:cursor-pointer select-none",
        variants: {
            variant: {
                Default: "text-gray-700 hover:bg-black/10",
                Danger: "text-gray-700 hover:bg-red-500/20 hover:text-red-700",
                Menu: "w-full justify-start text-gray-800 hover:bg-gray-100",
            },
            size: {
                Default: "size-7",
                Menu: "h-8 px-3",
            }
        },
        component: {
            element: button
        }
    }
}
