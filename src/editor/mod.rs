use crate::api::ApiClient;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Notice, Notification, Panel, PanelBody, PanelDescription,
    PanelFooter, PanelHeader, PanelTitle, SyncIndicator, TextField,
};
use crate::forms::{fill_missing_translations, NavItemDraft};
use crate::models::{FlatNode, Locale, NavItem, ROOT_ID};
use crate::state::{
    create_item, delete_item, move_and_sync, reconcile, update_item, AppContext, DragMove,
    NavError, SyncOutcome, SyncPhase, TreeHandle, TreeStore,
};
use crate::tree::{children_of, find_node};
use leptos::ev;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// Where a drop lands relative to the row under the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DropZone {
    Before,
    Inside,
    After,
}

impl DropZone {
    /// Top quarter inserts before, bottom quarter after, the rest nests.
    pub fn from_offset(offset_y: f64, height: f64) -> Self {
        if height <= 0.0 {
            return DropZone::Inside;
        }
        let ratio = offset_y / height;
        if ratio < 0.25 {
            DropZone::Before
        } else if ratio > 0.75 {
            DropZone::After
        } else {
            DropZone::Inside
        }
    }
}

/// Translate a drop gesture into a move request.
///
/// `target_id` may be [`ROOT_ID`] for the trailing "top level" drop area.
/// Returns `None` when the gesture would leave the tree unchanged.
pub(crate) fn resolve_drop(
    tree: &[FlatNode],
    dragged_id: &str,
    target_id: &str,
    zone: DropZone,
) -> Option<DragMove> {
    if dragged_id.trim().is_empty() {
        return None;
    }

    let mv = |parent: &str, index: usize| DragMove {
        dragged_id: Some(dragged_id.to_string()),
        new_parent_id: Some(parent.to_string()),
        destination_index: index,
    };

    if target_id == ROOT_ID {
        let count = children_of(tree, ROOT_ID)
            .iter()
            .filter(|n| n.id != dragged_id)
            .count();
        return Some(mv(ROOT_ID, count));
    }

    let target = find_node(tree, target_id)?;

    match zone {
        // Nesting onto itself is passed through so the cycle check reports it.
        DropZone::Inside => {
            let count = children_of(tree, target_id)
                .iter()
                .filter(|n| n.id != dragged_id)
                .count();
            Some(mv(target_id, count))
        }
        DropZone::Before | DropZone::After => {
            if dragged_id == target_id {
                return None;
            }
            let siblings: Vec<&FlatNode> = children_of(tree, &target.parent)
                .into_iter()
                .filter(|n| n.id != dragged_id)
                .collect();
            let idx = siblings.iter().position(|n| n.id == target_id)?;
            let index = if zone == DropZone::After { idx + 1 } else { idx };
            Some(mv(&target.parent, index))
        }
    }
}

/// One visible line of the manager, in display (pre-order) order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TreeRow {
    pub id: String,
    pub label: String,
    pub slug: String,
    pub href: Option<String>,
    pub is_external: bool,
    pub depth: usize,
    pub child_count: usize,
}

pub(crate) fn display_rows(tree: &[FlatNode]) -> Vec<TreeRow> {
    let mut out = Vec::with_capacity(tree.len());
    push_rows(tree, ROOT_ID, 0, &mut out);
    out
}

fn push_rows(tree: &[FlatNode], parent: &str, depth: usize, out: &mut Vec<TreeRow>) {
    // Depth guard for malformed cyclic data.
    if depth > tree.len() {
        return;
    }
    for node in children_of(tree, parent) {
        out.push(TreeRow {
            id: node.id.clone(),
            label: node.text.clone(),
            slug: node.item.slug.clone(),
            href: node.item.href().map(|s| s.to_string()),
            is_external: node.item.is_external,
            depth,
            child_count: children_of(tree, &node.id).len(),
        });
        push_rows(tree, &node.id, depth + 1, out);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormMode {
    Closed,
    Create { parent_id: Option<String> },
    Edit { id: String },
}

/// Source side of a drag: carry the id and allow only moves.
pub(crate) fn start_drag(dt: &web_sys::DataTransfer, id: &str) {
    let _ = dt.set_data("text/plain", id);
    dt.set_effect_allowed("move");
}

fn drop_zone_of(ev: &web_sys::DragEvent) -> DropZone {
    ev.current_target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .map(|el| el.get_bounding_client_rect())
        .map(|rect| DropZone::from_offset(ev.client_y() as f64 - rect.top(), rect.height()))
        .unwrap_or(DropZone::Inside)
}

/// The manager's store plus the server tree signal it was built from.
#[derive(Clone, Copy)]
pub(crate) struct ManagedTree {
    store: RwSignal<TreeStore>,
    server_items: RwSignal<Vec<NavItem>>,
}

impl TreeHandle for ManagedTree {
    fn with_store<R>(&self, f: impl FnOnce(&mut TreeStore) -> R) -> Option<R> {
        self.store.try_update(f)
    }

    fn accept_server_tree(&self, items: Vec<NavItem>) {
        self.store.try_update(|s| s.replace_snapshot(items.clone()));
        self.server_items.set(items);
    }
}

fn report(
    notice: RwSignal<Option<Notification>>,
    result: Result<SyncOutcome, NavError>,
    done: &str,
) {
    match result {
        Ok(SyncOutcome::Confirmed) => notice.set(Some(Notification::success(done))),
        Ok(_) => {}
        Err(e) => {
            if let NavError::Persistence(_) = e {
                error!("{e}");
            }
            notice.set(Some(Notification::error(e.to_string())));
        }
    }
}

/// Drag-and-drop editor for the site navigation.
///
/// `items` is the server tree; refreshes after a save are written back to it.
#[component]
pub fn NavMenuManager(items: RwSignal<Vec<NavItem>>) -> impl IntoView {
    let api_client = expect_context::<AppContext>().0.api_client;

    let store: RwSignal<TreeStore> = RwSignal::new(TreeStore::new(items.get_untracked()));
    let tree = ManagedTree {
        store,
        server_items: items,
    };
    let notice: RwSignal<Option<Notification>> = RwSignal::new(None);
    let form_mode: RwSignal<FormMode> = RwSignal::new(FormMode::Closed);

    let dragging_id: RwSignal<Option<String>> = RwSignal::new(None);
    let drop_hint: RwSignal<Option<(String, DropZone)>> = RwSignal::new(None);

    // New server props replace the snapshot.
    Effect::new(move |_| {
        let next = items.get();
        store.update(|s| s.replace_snapshot(next));
    });

    let saving = Signal::derive(move || store.with(|s| s.phase() == SyncPhase::Syncing));
    let syncing = Signal::derive(move || store.with(|s| s.is_syncing()));

    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" {
            form_mode.set(FormMode::Closed);
        }
    });

    let submit_structure = move || {
        let api = api_client.get_untracked();
        spawn_local(async move {
            report(notice, reconcile(&tree, &api).await, "Menu structure saved.");
        });
    };

    let on_move = Callback::new(move |mv: DragMove| {
        let api = api_client.get_untracked();
        spawn_local(async move {
            report(notice, move_and_sync(&tree, &api, &mv).await, "Menu structure saved.");
        });
    });

    let on_delete = Callback::new(move |id: String| {
        let api = api_client.get_untracked();
        spawn_local(async move {
            let result = delete_item(&tree, &api, &id)
                .await
                .map(|()| SyncOutcome::Confirmed);
            report(notice, result, "Menu item deleted.");
        });
    });

    let rows = move || store.with(|s| display_rows(s.tree()));

    view! {
        <div class="flex flex-col gap-4">
            <Panel>
                <PanelHeader>
                    <div class="flex flex-col gap-1.5">
                        <PanelTitle>"Navigation"</PanelTitle>
                        <PanelDescription>
                            "Drag items to reorder. Drop onto the middle of an item to nest it."
                        </PanelDescription>
                    </div>
                    <div class="flex items-center gap-2">
                        <SyncIndicator syncing=saving />
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            attr:disabled=move || syncing.get()
                            on:click=move |_| submit_structure()
                        >
                            "Sync"
                        </Button>
                        <Button
                            size=ButtonSize::Sm
                            on:click=move |_| form_mode.set(FormMode::Create { parent_id: None })
                        >
                            "Add item"
                        </Button>
                    </div>
                </PanelHeader>

                <PanelBody>
                    <Notice notice=notice />

                    <Show when=move || store.with(|s| s.tree().is_empty())>
                        <div class="py-6 text-center text-xs text-muted-foreground">
                            "No menu items yet."
                        </div>
                    </Show>

                    <div class="mt-2 space-y-0.5">
                        <For
                            each=rows
                            key=|r| r.clone()
                            children=move |row| {
                                view! {
                                    <NavMenuRow
                                        row=row
                                        dragging_id=dragging_id
                                        drop_hint=drop_hint
                                        store=store
                                        form_mode=form_mode
                                        on_move=on_move
                                        on_delete=on_delete
                                    />
                                }
                            }
                        />

                        <div
                            class=move || {
                                if dragging_id.get().is_some() {
                                    "mt-2 rounded-md border border-dashed px-3 py-2 text-center text-xs text-muted-foreground"
                                } else {
                                    "hidden"
                                }
                            }
                            on:dragover=move |ev: web_sys::DragEvent| {
                                ev.prevent_default();
                                drop_hint.set(Some((ROOT_ID.to_string(), DropZone::After)));
                            }
                            on:drop=move |ev: web_sys::DragEvent| {
                                ev.prevent_default();
                                drop_hint.set(None);
                                let Some(dragged) = dragging_id.get_untracked() else {
                                    return;
                                };
                                dragging_id.set(None);
                                let mv = store.with_untracked(|s| {
                                    resolve_drop(s.tree(), &dragged, ROOT_ID, DropZone::After)
                                });
                                if let Some(mv) = mv {
                                    on_move.run(mv);
                                }
                            }
                        >
                            "Drop here to move to the end of the top level"
                        </div>
                    </div>
                </PanelBody>
            </Panel>

            {move || {
                let mode = form_mode.get();
                (mode != FormMode::Closed).then(|| {
                    view! {
                        <NavItemForm
                            mode=mode
                            form_mode=form_mode
                            tree=tree
                            notice=notice
                        />
                    }
                })
            }}
        </div>
    }
}

#[component]
fn NavMenuRow(
    row: TreeRow,
    dragging_id: RwSignal<Option<String>>,
    drop_hint: RwSignal<Option<(String, DropZone)>>,
    store: RwSignal<TreeStore>,
    form_mode: RwSignal<FormMode>,
    on_move: Callback<DragMove>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let id_sv = StoredValue::new(row.id.clone());
    let indent_px = (row.depth * 20) as i32;
    let has_kids = row.child_count > 0;

    let row_class = move || {
        let id = id_sv.get_value();
        let base = "flex items-center gap-2 rounded-md border border-transparent px-2 py-1.5 text-sm";
        match drop_hint.get() {
            Some((hint_id, zone)) if hint_id == id => match zone {
                DropZone::Before => format!("{base} border-t-primary"),
                DropZone::After => format!("{base} border-b-primary"),
                DropZone::Inside => format!("{base} bg-primary/10 ring-1 ring-primary/30"),
            },
            _ if dragging_id.get().as_deref() == Some(id.as_str()) => format!("{base} opacity-50"),
            _ => format!("{base} hover:bg-accent/50"),
        }
    };

    let href = row.href.clone().unwrap_or_else(|| "—".to_string());
    let external_badge = row.is_external.then(|| {
        view! { <span class="rounded bg-muted px-1.5 text-[10px] uppercase">"ext"</span> }
    });

    view! {
        <div style=format!("padding-left: {}px", indent_px)>
            <div
                id=move || format!("nav-item-{}", id_sv.get_value())
                class=row_class
                draggable="true"
                on:dragstart=move |ev: web_sys::DragEvent| {
                    let id = id_sv.get_value();
                    if let Some(dt) = ev.data_transfer() {
                        start_drag(&dt, &id);
                    }
                    dragging_id.set(Some(id));
                }
                on:dragend=move |_ev: web_sys::DragEvent| {
                    dragging_id.set(None);
                    drop_hint.set(None);
                }
                on:dragover=move |ev: web_sys::DragEvent| {
                    ev.prevent_default();
                    if let Some(dt) = ev.data_transfer() {
                        dt.set_drop_effect("move");
                    }
                    let next = Some((id_sv.get_value(), drop_zone_of(&ev)));
                    if drop_hint.get_untracked() != next {
                        drop_hint.set(next);
                    }
                }
                on:drop=move |ev: web_sys::DragEvent| {
                    ev.prevent_default();
                    drop_hint.set(None);

                    let dragged = ev
                        .data_transfer()
                        .and_then(|dt| dt.get_data("text/plain").ok())
                        .filter(|s| !s.trim().is_empty())
                        .or_else(|| dragging_id.get_untracked());
                    dragging_id.set(None);
                    let Some(dragged) = dragged else {
                        return;
                    };

                    let zone = drop_zone_of(&ev);
                    let target = id_sv.get_value();
                    let mv = store.with_untracked(|s| resolve_drop(s.tree(), &dragged, &target, zone));
                    if let Some(mv) = mv {
                        on_move.run(mv);
                    }
                }
            >
                <span class="cursor-grab select-none text-muted-foreground">"⋮⋮"</span>
                <div class="min-w-0 flex-1">
                    <div class="flex items-center gap-2">
                        <span class="truncate font-medium">{row.label.clone()}</span>
                        {external_badge}
                        {has_kids.then(|| view! {
                            <span class="text-[11px] text-muted-foreground">
                                {format!("{} sub-item(s)", row.child_count)}
                            </span>
                        })}
                    </div>
                    <div class="truncate text-[11px] text-muted-foreground">
                        {format!("{} · {}", row.slug, href)}
                    </div>
                </div>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    on:click=move |_| form_mode.set(FormMode::Create { parent_id: Some(id_sv.get_value()) })
                >
                    "Add child"
                </Button>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    on:click=move |_| form_mode.set(FormMode::Edit { id: id_sv.get_value() })
                >
                    "Edit"
                </Button>
                <Button
                    variant=ButtonVariant::Destructive
                    size=ButtonSize::Sm
                    attr:title=move || if has_kids { "Remove its sub-items first" } else { "Delete" }
                    on:click=move |_| on_delete.run(id_sv.get_value())
                >
                    "Delete"
                </Button>
            </div>
        </div>
    }
}

#[component]
fn NavItemForm(
    mode: FormMode,
    form_mode: RwSignal<FormMode>,
    tree: ManagedTree,
    notice: RwSignal<Option<Notification>>,
) -> impl IntoView {
    let api_client = expect_context::<AppContext>().0.api_client;
    let store = tree.store;

    let existing: Option<NavItem> = match &mode {
        FormMode::Edit { id } => {
            store.with_untracked(|s| find_node(s.tree(), id).map(|n| n.item.clone()))
        }
        _ => None,
    };
    let initial = existing
        .as_ref()
        .map(NavItemDraft::from_item)
        .unwrap_or_default();

    let slug = RwSignal::new(initial.slug.clone());
    let path = RwSignal::new(initial.path.clone());
    let url = RwSignal::new(initial.url.clone());
    let is_external = RwSignal::new(initial.is_external);
    let titles: Vec<(Locale, RwSignal<String>)> = Locale::all()
        .map(|l| {
            let v = initial.translations.get(l.code()).cloned().unwrap_or_default();
            (l, RwSignal::new(v))
        })
        .collect();
    let titles_sv = StoredValue::new(titles.clone());

    let form_error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);
    let translating = RwSignal::new(false);

    let is_edit = matches!(mode, FormMode::Edit { .. });
    let mode_sv = StoredValue::new(mode.clone());

    let heading = match (&mode, &existing) {
        (FormMode::Edit { .. }, Some(item)) => format!("Edit \"{}\"", item.label()),
        (FormMode::Create { parent_id: Some(p) }, _) => {
            let parent = store
                .with_untracked(|s| find_node(s.tree(), p).map(|n| n.text.clone()))
                .unwrap_or_default();
            format!("New item under \"{parent}\"")
        }
        _ => "New top-level item".to_string(),
    };

    let read_draft = move || NavItemDraft {
        slug: slug.get_untracked(),
        path: path.get_untracked(),
        url: url.get_untracked(),
        is_external: is_external.get_untracked(),
        translations: titles_sv
            .get_value()
            .iter()
            .map(|(l, v)| (l.code().to_string(), v.get_untracked()))
            .collect(),
    };

    let on_translate = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        let mut draft = read_draft();
        let api: ApiClient = api_client.get_untracked();
        translating.set(true);
        spawn_local(async move {
            let failed = fill_missing_translations(&mut draft, &api).await;
            for (l, sig) in titles_sv.get_value() {
                if let Some(v) = draft.translations.get(l.code()) {
                    sig.set(v.clone());
                }
            }
            if !failed.is_empty() {
                let codes: Vec<&str> = failed.iter().map(|l| l.code()).collect();
                form_error.set(Some(format!("Could not translate: {}", codes.join(", "))));
            }
            translating.set(false);
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        form_error.set(None);

        let draft = read_draft();
        let api = api_client.get_untracked();
        let mode = mode_sv.get_value();

        saving.set(true);
        spawn_local(async move {
            let (result, done) = match &mode {
                FormMode::Create { parent_id } => (
                    create_item(&tree, &api, &draft, parent_id.as_deref()).await,
                    "Menu item created.",
                ),
                FormMode::Edit { id } => (
                    update_item(&tree, &api, id, &draft).await,
                    "Menu item updated.",
                ),
                FormMode::Closed => return,
            };
            saving.set(false);

            match result {
                Ok(()) => {
                    notice.set(Some(Notification::success(done)));
                    form_mode.set(FormMode::Closed);
                }
                Err(e) => {
                    if let NavError::Persistence(_) = e {
                        error!("{e}");
                    }
                    form_error.set(Some(e.to_string()));
                }
            }
        });
    };

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>{heading}</PanelTitle>
            </PanelHeader>
            <form class="flex flex-col gap-4" on:submit=on_submit>
                <PanelBody>
                    <div class="grid gap-3 sm:grid-cols-2">
                        <TextField
                            id="nav-slug"
                            label="Slug"
                            bind_value=slug
                            placeholder="e.g. events"
                            readonly=is_edit
                            hint=if is_edit { "The slug cannot be changed." } else { "" }
                        />
                        <div class="flex items-end gap-2 pb-2 text-xs">
                            <input
                                id="nav-external"
                                type="checkbox"
                                prop:checked=move || is_external.get()
                                on:change=move |ev| is_external.set(event_target_checked(&ev))
                            />
                            <label r#for="nav-external">"External link"</label>
                        </div>
                        {move || {
                            if is_external.get() {
                                view! {
                                    <TextField id="nav-url" label="URL" bind_value=url placeholder="https://" />
                                }
                                .into_any()
                            } else {
                                view! {
                                    <TextField id="nav-path" label="Path" bind_value=path placeholder="/events" />
                                }
                                .into_any()
                            }
                        }}
                    </div>

                    <div class="mt-4 grid gap-3 sm:grid-cols-2">
                        {titles
                            .into_iter()
                            .map(|(l, sig)| {
                                view! {
                                    <TextField
                                        id=format!("nav-title-{}", l.code())
                                        label=format!("Title ({})", l.code())
                                        bind_value=sig
                                    />
                                }
                            })
                            .collect_view()}
                    </div>

                    {move || form_error.get().map(|e| view! {
                        <div class="mt-3 text-xs text-destructive">{e}</div>
                    })}
                </PanelBody>
                <PanelFooter>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        attr:disabled=move || translating.get()
                        on:click=on_translate
                    >
                        {move || if translating.get() { "Translating…" } else { "Fill missing titles" }}
                    </Button>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.prevent_default();
                            form_mode.set(FormMode::Closed);
                        }
                    >
                        "Cancel"
                    </Button>
                    <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>
                        {move || if saving.get() { "Saving…" } else { "Save" }}
                    </Button>
                </PanelFooter>
            </form>
        </Panel>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Translations;
    use crate::tree::{apply_move, build_nested, flatten, to_structure_payload};

    fn item(id: &str, children: Vec<NavItem>) -> NavItem {
        NavItem {
            id: id.to_string(),
            parent_id: None,
            slug: id.to_string(),
            path: Some(format!("/{id}")),
            url: None,
            is_external: false,
            translations: Translations::new(),
            order: 0,
            children,
        }
    }

    /// a(b, c), d
    fn tree() -> Vec<FlatNode> {
        flatten(&[
            item("a", vec![item("b", vec![]), item("c", vec![])]),
            item("d", vec![]),
        ])
    }

    fn apply(mv: DragMove) -> Vec<(String, Option<String>, u32)> {
        let moved = apply_move(
            &tree(),
            mv.dragged_id.as_deref(),
            mv.new_parent_id.as_deref(),
            mv.destination_index,
        )
        .expect("move ok");
        to_structure_payload(&build_nested(&moved))
            .into_iter()
            .map(|e| (e.id, e.parent_id, e.order))
            .collect()
    }

    #[test]
    fn test_drop_zone_thresholds() {
        assert_eq!(DropZone::from_offset(2.0, 40.0), DropZone::Before);
        assert_eq!(DropZone::from_offset(20.0, 40.0), DropZone::Inside);
        assert_eq!(DropZone::from_offset(38.0, 40.0), DropZone::After);
        assert_eq!(DropZone::from_offset(5.0, 0.0), DropZone::Inside);
    }

    #[test]
    fn test_drop_before_first_root() {
        let mv = resolve_drop(&tree(), "d", "a", DropZone::Before).expect("a move");
        assert_eq!(mv.new_parent_id.as_deref(), Some(ROOT_ID));
        assert_eq!(mv.destination_index, 0);
        assert_eq!(apply(mv)[0], ("d".to_string(), None, 1));
    }

    #[test]
    fn test_drop_after_sibling_skips_dragged_node() {
        let mv = resolve_drop(&tree(), "b", "c", DropZone::After).expect("a move");
        assert_eq!(mv.new_parent_id.as_deref(), Some("a"));
        assert_eq!(mv.destination_index, 1);
        let rows = apply(mv);
        assert_eq!(rows[1], ("c".to_string(), Some("a".to_string()), 1));
        assert_eq!(rows[2], ("b".to_string(), Some("a".to_string()), 2));
    }

    #[test]
    fn test_drop_inside_appends_child() {
        let mv = resolve_drop(&tree(), "d", "a", DropZone::Inside).expect("a move");
        assert_eq!(mv.new_parent_id.as_deref(), Some("a"));
        assert_eq!(mv.destination_index, 2);
    }

    #[test]
    fn test_drop_on_root_area_appends_at_top_level() {
        let mv = resolve_drop(&tree(), "b", ROOT_ID, DropZone::After).expect("a move");
        assert_eq!(mv.new_parent_id.as_deref(), Some(ROOT_ID));
        assert_eq!(mv.destination_index, 2);
    }

    #[test]
    fn test_drop_next_to_itself_is_ignored() {
        assert!(resolve_drop(&tree(), "b", "b", DropZone::Before).is_none());
        assert!(resolve_drop(&tree(), "", "a", DropZone::Inside).is_none());
        assert!(resolve_drop(&tree(), "b", "missing", DropZone::Inside).is_none());
    }

    #[test]
    fn test_drop_inside_descendant_is_reported_by_move_engine() {
        let mv = resolve_drop(&tree(), "a", "b", DropZone::Inside).expect("a move");
        assert!(apply_move(
            &tree(),
            mv.dragged_id.as_deref(),
            mv.new_parent_id.as_deref(),
            mv.destination_index
        )
        .is_err());
    }

    #[test]
    fn test_display_rows_are_preorder_with_depth() {
        let moved = apply_move(&tree(), Some("a"), Some(ROOT_ID), 1).expect("move ok");
        let rows = display_rows(&moved);
        let got: Vec<(&str, usize, usize)> = rows
            .iter()
            .map(|r| (r.id.as_str(), r.depth, r.child_count))
            .collect();
        assert_eq!(got, vec![("d", 0, 0), ("a", 0, 2), ("b", 1, 0), ("c", 1, 0)]);
        assert_eq!(rows[1].href.as_deref(), Some("/a"));
    }
}
