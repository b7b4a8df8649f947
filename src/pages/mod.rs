use crate::api::{ApiErrorKind, NavMenuBackend};
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::editor::NavMenuManager;
use crate::state::AppContext;
use icons::LoaderCircle;
use leptos::logging::{error, log};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Admin page hosting the navigation menu manager.
#[component]
pub fn NavMenuPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let nav_items = app_state.0.nav_items;
    let nav_loading = app_state.0.nav_loading;
    let nav_error = app_state.0.nav_error;
    let nav_request_id = app_state.0.nav_request_id;
    let api_client = app_state.0.api_client;

    let load = move || {
        // Request id for stale-response protection.
        let req_id = nav_request_id.get_untracked().saturating_add(1);
        nav_request_id.set(req_id);

        nav_loading.set(true);
        nav_error.set(None);

        let api = api_client.get_untracked();
        spawn_local(async move {
            let result = api.list_nav_items().await;

            if nav_request_id.get_untracked() != req_id {
                log!("dropping stale menu load #{req_id}");
                return;
            }

            match result {
                Ok(items) => nav_items.set(items),
                Err(e) => {
                    error!("loading navigation menu failed: {e}");
                    let msg = if e.kind == ApiErrorKind::Unauthorized {
                        "Not authorized. Check the configured API key.".to_string()
                    } else {
                        e.to_string()
                    };
                    nav_error.set(Some(msg));
                }
            }
            nav_loading.set(false);
        });
    };

    Effect::new(move |_| load());

    let has_items = move || nav_items.with(|v| !v.is_empty());

    view! {
        <div class="mx-auto flex max-w-3xl flex-col gap-4 px-4 py-8">
            <Show when=move || nav_loading.get() && !has_items()>
                <div class="flex items-center gap-2 text-xs text-muted-foreground">
                    <LoaderCircle class="size-4 animate-spin" />
                    "Loading navigation…"
                </div>
            </Show>

            {move || nav_error.get().map(|e| view! {
                <div class="flex items-center justify-between gap-3 rounded-md border border-destructive/50 px-4 py-3 text-xs text-destructive">
                    <span>{e}</span>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| load()
                    >
                        "Retry"
                    </Button>
                </div>
            })}

            <Show when=move || !nav_loading.get() || has_items()>
                <NavMenuManager items=nav_items />
            </Show>
        </div>
    }
}
