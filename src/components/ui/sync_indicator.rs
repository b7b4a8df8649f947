use icons::{Check, LoaderCircle};
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn SyncIndicator(
    #[prop(into)] syncing: Signal<bool>,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let merged_class = tw_merge!("flex items-center gap-1.5 text-xs text-muted-foreground", class);

    view! {
        <span class=merged_class>
            {move || {
                if syncing.get() {
                    view! {
                        <LoaderCircle class="size-3.5 animate-spin" attr:role="status" attr:aria-label="Saving" />
                        <span>"Saving…"</span>
                    }
                    .into_any()
                } else {
                    view! {
                        <Check class="size-3.5" />
                        <span>"Saved"</span>
                    }
                    .into_any()
                }
            }}
        </span>
    }
}
