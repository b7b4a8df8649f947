pub(crate) mod nav_tree;

use crate::api::{ApiClient, EnvConfig};
use crate::models::NavItem;
use leptos::prelude::*;

pub(crate) use nav_tree::{
    create_item, delete_item, move_and_sync, reconcile, update_item, DragMove, NavError,
    SyncOutcome, SyncPhase, TreeHandle, TreeStore,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Server-confirmed nested menu, as last loaded.
    pub nav_items: RwSignal<Vec<NavItem>>,
    pub nav_loading: RwSignal<bool>,
    pub nav_error: RwSignal<Option<String>>,

    /// Load guard: responses for an older request id are ignored.
    pub nav_request_id: RwSignal<u64>,
}

impl AppState {
    pub fn new() -> Self {
        let cfg = EnvConfig::new();

        Self {
            api_client: RwSignal::new(ApiClient::from_env(&cfg)),
            nav_items: RwSignal::new(vec![]),
            nav_loading: RwSignal::new(false),
            nav_error: RwSignal::new(None),
            nav_request_id: RwSignal::new(0),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
