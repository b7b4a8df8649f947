use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {NoticeFrame, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {NoticeText, p, "text-sm leading-relaxed"}
}

pub use components::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeTone {
    Success,
    Error,
}

impl NoticeTone {
    fn class(self) -> &'static str {
        match self {
            NoticeTone::Success => "border-success/40 text-success",
            NoticeTone::Error => "border-destructive/50 bg-destructive/5 text-destructive",
        }
    }
}

/// User-visible message shown above the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub tone: NoticeTone,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Error,
            message: message.into(),
        }
    }
}

#[component]
pub fn Notice(notice: RwSignal<Option<Notification>>) -> impl IntoView {
    move || {
        notice.get().map(|n| {
            view! {
                <NoticeFrame class=n.tone.class() attr:role="status">
                    <div class="flex items-start justify-between gap-3">
                        <NoticeText>{n.message.clone()}</NoticeText>
                        <button
                            class="text-xs text-muted-foreground hover:text-foreground"
                            on:click=move |_| notice.set(None)
                            aria-label="Dismiss"
                        >
                            "×"
                        </button>
                    </div>
                </NoticeFrame>
            }
        })
    }
}
