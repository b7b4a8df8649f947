use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Labeled text input bound to a signal.
#[component]
pub fn TextField(
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    #[prop(into)] bind_value: RwSignal<String>,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] hint: String,
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] disabled: Signal<bool>,
    #[prop(optional)] readonly: bool,
) -> impl IntoView {
    let input_class = tw_merge!(
        "placeholder:text-muted-foreground border-input flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs outline-none",
        "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2",
        "disabled:cursor-not-allowed disabled:opacity-50 read-only:bg-muted",
        class
    );

    // Manual wiring instead of `bind:value`; see the Leptos binding API churn.
    let on_input = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
                bind_value.set(input.value());
            }
        }
    };

    let has_hint = !hint.is_empty();

    view! {
        <div class="flex flex-col gap-1.5">
            <label class="text-xs font-medium leading-none" r#for=id.clone()>
                {label}
            </label>
            <input
                data-name="TextField"
                type="text"
                id=id
                class=input_class
                placeholder=placeholder
                readonly=readonly
                disabled=move || disabled.get()
                prop:value=move || bind_value.get()
                on:input=on_input
            />
            {has_hint.then(|| view! { <p class="text-[11px] text-muted-foreground">{hint}</p> })}
        </div>
    }
}
