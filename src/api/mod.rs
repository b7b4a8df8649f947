use crate::forms::{Translator, ValidDraft};
use crate::models::{Locale, NavItem, StructureEntry, Translations};
use crate::tree::nest_rows;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
    /// The backend answered `{ success: false }`.
    Rejected,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

pub(crate) const REJECTED_FALLBACK: &str = "The server rejected the change.";

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    pub(crate) fn rejected(message: Option<String>) -> Self {
        Self {
            kind: ApiErrorKind::Rejected,
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| REJECTED_FALLBACK.to_string()),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub api_key: Option<String>,
}

const DEFAULT_API_URL: &str = "http://localhost:3000";

impl EnvConfig {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(cfg) = Self::from_window() {
                return cfg;
            }
        }

        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
        }
    }

    // We support BOTH `window.ENV.API_URL` (documented) and `window.ENV.api_url`.
    #[cfg(target_arch = "wasm32")]
    fn from_window() -> Option<Self> {
        let env = web_sys::window()?.get("ENV")?;
        if env.is_undefined() || !env.is_object() {
            return None;
        }

        let read = |keys: &[&str]| {
            keys.iter().find_map(|k| {
                js_sys::Reflect::get(&env, &(*k).into())
                    .ok()
                    .and_then(|v| v.as_string())
                    .filter(|s| !s.trim().is_empty())
            })
        };

        Some(Self {
            api_url: read(&["API_URL", "api_url"]).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: read(&["API_KEY", "api_key"]),
        })
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `{ success, error? }` envelope returned by every mutation endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct MutationResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl MutationResponse {
    pub fn into_result(self) -> ApiResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::rejected(self.error))
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateNavItemRequest {
    pub slug: String,
    pub parent_id: Option<String>,
    pub path: Option<String>,
    pub url: Option<String>,
    pub is_external: bool,
    pub translations: Translations,
    /// Appended after existing siblings.
    pub order: u32,
}

impl CreateNavItemRequest {
    pub fn new(draft: ValidDraft, parent_id: Option<String>, order: u32) -> Self {
        Self {
            slug: draft.slug,
            parent_id,
            path: draft.path,
            url: draft.url,
            is_external: draft.is_external,
            translations: draft.translations,
            order,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateNavItemRequest {
    pub id: String,
    pub parent_id: Option<String>,
    pub path: Option<String>,
    pub url: Option<String>,
    pub is_external: bool,
    pub translations: Translations,
}

impl UpdateNavItemRequest {
    pub fn new(id: String, draft: ValidDraft, parent_id: Option<String>) -> Self {
        Self {
            id,
            parent_id,
            path: draft.path,
            url: draft.url,
            is_external: draft.is_external,
            translations: draft.translations,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct SyncStructureRequest<'a> {
    pub items: &'a [StructureEntry],
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct TranslateRequest {
    pub text: String,
    pub from: String,
    pub to: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct TranslateResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Persistence collaborator of the navigation tree manager.
#[allow(async_fn_in_trait)]
pub(crate) trait NavMenuBackend {
    /// Nested items, siblings in display order.
    async fn list_nav_items(&self) -> ApiResult<Vec<NavItem>>;
    async fn create_nav_menu_item(&self, req: CreateNavItemRequest) -> ApiResult<()>;
    async fn update_nav_menu_item(&self, req: UpdateNavItemRequest) -> ApiResult<()>;
    async fn delete_nav_menu_item(&self, id: &str) -> ApiResult<()>;
    /// Batch re-submit of every `(id, parentId, order)` position.
    async fn sync_nav_menu_structure(&self, payload: &[StructureEntry]) -> ApiResult<()>;
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn from_env(cfg: &EnvConfig) -> Self {
        Self {
            api_key: cfg.api_key.clone(),
            ..Self::new(cfg.api_url.clone())
        }
    }

    pub(crate) fn get_auth_header(&self) -> Option<String> {
        self.api_key.as_ref().map(|k| format!("Bearer {k}"))
    }

    fn with_auth_headers(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(key) = &self.api_key {
            req = req.header("apikey", key.as_str());
        }
        if let Some(bearer) = self.get_auth_header() {
            req = req.header("Authorization", bearer);
        }
        req
    }

    pub(crate) fn item_path(id: &str) -> String {
        format!("/api/nav-menu/items/{}", urlencoding::encode(id))
    }

    async fn request_api<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.with_auth_headers(client.request(method, url));

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    async fn mutate(
        &self,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<()> {
        self.request_api::<MutationResponse>(reqwest::Method::POST, path, body)
            .await?
            .into_result()
    }

    /// Accepts a nested list, a flat row list, or either under `items`.
    pub(crate) fn parse_nav_list_response(data: serde_json::Value) -> ApiResult<Vec<NavItem>> {
        let list = match data {
            serde_json::Value::Object(mut obj) => obj
                .remove("items")
                .or_else(|| obj.remove("data"))
                .unwrap_or(serde_json::Value::Array(vec![])),
            other => other,
        };

        let items: Vec<NavItem> = serde_json::from_value(list).map_err(ApiError::parse)?;

        // Without any `children` the list is flat rows in arbitrary wire order.
        if items.iter().any(|i| !i.children.is_empty()) {
            Ok(items)
        } else {
            Ok(nest_rows(items))
        }
    }
}

impl NavMenuBackend for ApiClient {
    async fn list_nav_items(&self) -> ApiResult<Vec<NavItem>> {
        let data: serde_json::Value = self
            .request_api(reqwest::Method::GET, "/api/nav-menu", None::<&()>)
            .await?;
        Self::parse_nav_list_response(data)
    }

    async fn create_nav_menu_item(&self, req: CreateNavItemRequest) -> ApiResult<()> {
        self.mutate("/api/nav-menu/items", Some(&req)).await
    }

    async fn update_nav_menu_item(&self, req: UpdateNavItemRequest) -> ApiResult<()> {
        self.mutate(&Self::item_path(&req.id), Some(&req)).await
    }

    async fn delete_nav_menu_item(&self, id: &str) -> ApiResult<()> {
        let path = format!("{}/delete", Self::item_path(id));
        self.mutate(&path, None::<&()>).await
    }

    async fn sync_nav_menu_structure(&self, payload: &[StructureEntry]) -> ApiResult<()> {
        self.mutate(
            "/api/nav-menu/structure",
            Some(&SyncStructureRequest { items: payload }),
        )
        .await
    }
}

impl Translator for ApiClient {
    async fn translate(&self, text: &str, from: Locale, to: Locale) -> Result<String, String> {
        let req = TranslateRequest {
            text: text.to_string(),
            from: from.code().to_string(),
            to: to.code().to_string(),
        };
        let resp: TranslateResponse = self
            .request_api(reqwest::Method::POST, "/api/ai/translate", Some(&req))
            .await
            .map_err(|e| e.to_string())?;

        match (resp.text, resp.error) {
            (Some(t), _) => Ok(t),
            (None, Some(e)) => Err(e),
            (None, None) => Err("Empty translation".to_string()),
        }
    }
}
