use crate::api::{ApiError, CreateNavItemRequest, NavMenuBackend, UpdateNavItemRequest};
use crate::forms::{NavItemDraft, ValidationError};
use crate::models::{FlatNode, NavItem, StructureEntry, ROOT_ID};
use crate::tree::{apply_move, build_nested, children_of, find_node, flatten, to_structure_payload};
use leptos::logging::{error, log, warn};

#[derive(Clone, Debug)]
pub(crate) enum NavError {
    /// Rejected locally; nothing was sent and state is unchanged.
    Validation(ValidationError),
    /// The backend call failed or answered `{ success: false }`.
    Persistence(ApiError),
}

impl std::fmt::Display for NavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavError::Validation(e) => write!(f, "{e}"),
            NavError::Persistence(e) => write!(f, "Saving failed: {e}"),
        }
    }
}

impl std::error::Error for NavError {}

impl From<ValidationError> for NavError {
    fn from(e: ValidationError) -> Self {
        NavError::Validation(e)
    }
}

impl From<ApiError> for NavError {
    fn from(e: ApiError) -> Self {
        NavError::Persistence(e)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SyncPhase {
    Idle,
    OptimisticallyMutated,
    Syncing,
}

/// A move as detected by the drag layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DragMove {
    pub dragged_id: Option<String>,
    pub new_parent_id: Option<String>,
    pub destination_index: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct PendingSync {
    pub ticket: u64,
    pub payload: Vec<StructureEntry>,
}

#[derive(Clone, Debug)]
pub(crate) enum SyncOutcome {
    Confirmed,
    RolledBack(ApiError),
    /// A newer submission was issued; this response did not decide the tree.
    Superseded,
}

/// Local copy of the server-owned menu tree, optimistically edited.
///
/// `snapshot` is the last server-confirmed nested tree; `tree` is what the
/// user sees. Every structure submission gets a ticket and only the latest
/// ticket's response decides the visible tree.
#[derive(Clone, Debug)]
pub(crate) struct TreeStore {
    snapshot: Vec<NavItem>,
    tree: Vec<FlatNode>,
    phase: SyncPhase,
    latest_ticket: u64,
    /// Highest ticket the backend accepted.
    confirmed_ticket: u64,
    /// Nested trees of the submissions still in flight.
    submitted: Vec<(u64, Vec<NavItem>)>,
    in_flight: usize,
}

impl TreeStore {
    pub fn new(snapshot: Vec<NavItem>) -> Self {
        let tree = flatten(&snapshot);
        Self {
            snapshot,
            tree,
            phase: SyncPhase::Idle,
            latest_ticket: 0,
            confirmed_ticket: 0,
            submitted: Vec::new(),
            in_flight: 0,
        }
    }

    pub fn tree(&self) -> &[FlatNode] {
        &self.tree
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight > 0
    }

    /// Optimistic drag-and-drop; the tree is untouched when the move is refused.
    pub fn apply_drag(&mut self, mv: &DragMove) -> Result<(), ValidationError> {
        let next = apply_move(
            &self.tree,
            mv.dragged_id.as_deref(),
            mv.new_parent_id.as_deref(),
            mv.destination_index,
        )?;
        self.tree = next;
        self.phase = SyncPhase::OptimisticallyMutated;
        Ok(())
    }

    /// Start a full-structure submission of the current tree.
    pub fn begin_sync(&mut self) -> PendingSync {
        let nested = build_nested(&self.tree);
        let payload = to_structure_payload(&nested);

        self.latest_ticket += 1;
        self.submitted.push((self.latest_ticket, nested));
        self.in_flight += 1;
        self.phase = SyncPhase::Syncing;

        PendingSync {
            ticket: self.latest_ticket,
            payload,
        }
    }

    pub fn finish_sync(&mut self, ticket: u64, result: Result<(), ApiError>) -> SyncOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        let submitted = self
            .submitted
            .iter()
            .position(|(t, _)| *t == ticket)
            .map(|i| self.submitted.remove(i).1);

        // Any accepted structure newer than the last one becomes the rollback base.
        if result.is_ok() && ticket > self.confirmed_ticket {
            self.confirmed_ticket = ticket;
            if let Some(nested) = submitted {
                self.snapshot = nested;
            }
        }

        if ticket != self.latest_ticket {
            log!("structure sync response #{ticket} superseded by #{}", self.latest_ticket);
            if result.is_ok() && self.confirmed_ticket == ticket && self.phase == SyncPhase::Idle {
                // The newest submission already failed; show what the server holds.
                self.tree = flatten(&self.snapshot);
            }
            return SyncOutcome::Superseded;
        }

        match result {
            Ok(()) => {
                if self.phase == SyncPhase::Syncing {
                    self.phase = SyncPhase::Idle;
                }
                SyncOutcome::Confirmed
            }
            Err(e) => {
                warn!("structure sync #{ticket} failed, rolling back: {e}");
                self.tree = flatten(&self.snapshot);
                self.phase = SyncPhase::Idle;
                SyncOutcome::RolledBack(e)
            }
        }
    }

    /// Accept a freshly fetched server tree.
    ///
    /// The visible tree is re-projected only when no local change is pending.
    pub fn replace_snapshot(&mut self, snapshot: Vec<NavItem>) {
        self.snapshot = snapshot;
        if self.in_flight == 0 && self.phase != SyncPhase::OptimisticallyMutated {
            self.tree = flatten(&self.snapshot);
            self.phase = SyncPhase::Idle;
        }
    }

    /// Sibling position a new child of `parent_id` is appended at.
    pub fn next_order(&self, parent_id: Option<&str>) -> u32 {
        children_of(&self.tree, parent_id.unwrap_or(ROOT_ID)).len() as u32 + 1
    }

    pub fn prepare_create(
        &self,
        draft: &NavItemDraft,
        parent_id: Option<&str>,
    ) -> Result<CreateNavItemRequest, ValidationError> {
        if let Some(p) = parent_id {
            if find_node(&self.tree, p).is_none() {
                return Err(ValidationError::UnknownParent(p.to_string()));
            }
        }
        let valid = draft.validate_create(&self.tree)?;
        Ok(CreateNavItemRequest::new(
            valid,
            parent_id.map(|s| s.to_string()),
            self.next_order(parent_id),
        ))
    }

    /// Update keeps the item's slug and current parent.
    pub fn prepare_update(
        &self,
        id: &str,
        draft: &NavItemDraft,
    ) -> Result<UpdateNavItemRequest, ValidationError> {
        let node = find_node(&self.tree, id)
            .ok_or_else(|| ValidationError::UnknownItem(id.to_string()))?;
        let valid = draft.validate_update(&node.item.slug)?;
        let parent_id = (!node.is_root_level()).then(|| node.parent.clone());
        Ok(UpdateNavItemRequest::new(id.to_string(), valid, parent_id))
    }

    /// Items with children cannot be deleted.
    pub fn check_delete(&self, id: &str) -> Result<(), ValidationError> {
        if find_node(&self.tree, id).is_none() {
            return Err(ValidationError::UnknownItem(id.to_string()));
        }
        let count = children_of(&self.tree, id).len();
        if count > 0 {
            return Err(ValidationError::HasChildren {
                id: id.to_string(),
                count,
            });
        }
        Ok(())
    }

    /// Drop a deleted (childless) item from both the tree and the snapshot.
    pub fn remove_node(&mut self, id: &str) {
        self.tree.retain(|n| n.id != id);
        remove_from_nested(&mut self.snapshot, id);
    }
}

fn remove_from_nested(items: &mut Vec<NavItem>, id: &str) -> bool {
    if let Some(pos) = items.iter().position(|i| i.id == id) {
        items.remove(pos);
        return true;
    }
    items
        .iter_mut()
        .any(|i| remove_from_nested(&mut i.children, id))
}

/// Owner of a [`TreeStore`] that the async operations below go through.
///
/// Each call is a short synchronous borrow; none is held across an `.await`.
/// `None` means the store is gone (its view was unmounted).
pub(crate) trait TreeHandle {
    fn with_store<R>(&self, f: impl FnOnce(&mut TreeStore) -> R) -> Option<R>;

    /// Hand a freshly fetched server tree to the store.
    fn accept_server_tree(&self, items: Vec<NavItem>) {
        self.with_store(|s| s.replace_snapshot(items));
    }
}

/// Re-fetch the server tree into the store.
pub(crate) async fn refresh<S: TreeHandle, B: NavMenuBackend>(
    store: &S,
    backend: &B,
) -> Result<(), NavError> {
    let items = backend.list_nav_items().await?;
    store.accept_server_tree(items);
    Ok(())
}

async fn refresh_after<S: TreeHandle, B: NavMenuBackend>(store: &S, backend: &B, what: &str) {
    if let Err(e) = refresh(store, backend).await {
        error!("menu refresh after {what} failed: {e}");
    }
}

/// Submit the current structure; roll back on failure, refresh on success.
pub(crate) async fn reconcile<S: TreeHandle, B: NavMenuBackend>(
    store: &S,
    backend: &B,
) -> Result<SyncOutcome, NavError> {
    let Some(pending) = store.with_store(|s| s.begin_sync()) else {
        return Ok(SyncOutcome::Superseded);
    };
    let result = backend.sync_nav_menu_structure(&pending.payload).await;

    match store.with_store(|s| s.finish_sync(pending.ticket, result)) {
        Some(SyncOutcome::Confirmed) => {
            refresh_after(store, backend, "sync").await;
            Ok(SyncOutcome::Confirmed)
        }
        Some(SyncOutcome::RolledBack(e)) => Err(NavError::Persistence(e)),
        Some(SyncOutcome::Superseded) | None => Ok(SyncOutcome::Superseded),
    }
}

/// Apply a drag-and-drop move and reconcile it.
pub(crate) async fn move_and_sync<S: TreeHandle, B: NavMenuBackend>(
    store: &S,
    backend: &B,
    mv: &DragMove,
) -> Result<SyncOutcome, NavError> {
    match store.with_store(|s| s.apply_drag(mv)) {
        Some(applied) => applied?,
        None => return Ok(SyncOutcome::Superseded),
    }
    reconcile(store, backend).await
}

pub(crate) async fn create_item<S: TreeHandle, B: NavMenuBackend>(
    store: &S,
    backend: &B,
    draft: &NavItemDraft,
    parent_id: Option<&str>,
) -> Result<(), NavError> {
    let Some(req) = store.with_store(|s| s.prepare_create(draft, parent_id)) else {
        return Ok(());
    };
    backend.create_nav_menu_item(req?).await?;
    refresh_after(store, backend, "create").await;
    Ok(())
}

pub(crate) async fn update_item<S: TreeHandle, B: NavMenuBackend>(
    store: &S,
    backend: &B,
    id: &str,
    draft: &NavItemDraft,
) -> Result<(), NavError> {
    let Some(req) = store.with_store(|s| s.prepare_update(id, draft)) else {
        return Ok(());
    };
    backend.update_nav_menu_item(req?).await?;
    refresh_after(store, backend, "update").await;
    Ok(())
}

pub(crate) async fn delete_item<S: TreeHandle, B: NavMenuBackend>(
    store: &S,
    backend: &B,
    id: &str,
) -> Result<(), NavError> {
    match store.with_store(|s| s.check_delete(id)) {
        Some(checked) => checked?,
        None => return Ok(()),
    }
    backend.delete_nav_menu_item(id).await?;
    store.with_store(|s| s.remove_node(id));
    refresh_after(store, backend, "delete").await;
    Ok(())
}
