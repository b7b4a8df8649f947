use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Panel, section, "bg-card text-card-foreground flex flex-col gap-4 rounded-xl border py-5 shadow-sm"}
    clx! {PanelHeader, div, "flex items-start justify-between gap-3 px-5"}
    clx! {PanelTitle, h2, "leading-none font-semibold"}
    clx! {PanelDescription, p, "text-muted-foreground text-xs"}
    clx! {PanelBody, div, "px-5"}
    clx! {PanelFooter, footer, "flex items-center justify-end gap-2 px-5"}
}

pub use components::*;
