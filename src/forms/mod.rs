use crate::models::{FlatNode, Locale, Translations};
use crate::tree::{contains_slug, MoveRejection};
use leptos::logging::warn;

/// Local, pre-network validation failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ValidationError {
    EmptySlug,
    InvalidSlug(String),
    DuplicateSlug(String),
    MissingUrl,
    UnknownItem(String),
    UnknownParent(String),
    HasChildren { id: String, count: usize },
    Move(MoveRejection),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptySlug => write!(f, "Slug is required"),
            ValidationError::InvalidSlug(s) => write!(
                f,
                "Slug \"{s}\" may only contain lowercase letters, digits, '-' and '_'"
            ),
            ValidationError::DuplicateSlug(s) => {
                write!(f, "Slug \"{s}\" is already used by another menu item")
            }
            ValidationError::MissingUrl => write!(f, "External links need a URL"),
            ValidationError::UnknownItem(id) => write!(f, "Menu item {id} no longer exists"),
            ValidationError::UnknownParent(id) => {
                write!(f, "Parent menu item {id} no longer exists")
            }
            ValidationError::HasChildren { count, .. } => write!(
                f,
                "This item has {count} sub-item(s). Move or delete them first."
            ),
            ValidationError::Move(r) => write!(f, "{r}"),
        }
    }
}

impl From<MoveRejection> for ValidationError {
    fn from(r: MoveRejection) -> Self {
        ValidationError::Move(r)
    }
}

/// Editable fields of a menu item, as typed into the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NavItemDraft {
    pub slug: String,
    pub path: String,
    pub url: String,
    pub is_external: bool,
    pub translations: Translations,
}

/// Draft after validation; link target and translations normalized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ValidDraft {
    pub slug: String,
    pub path: Option<String>,
    pub url: Option<String>,
    pub is_external: bool,
    pub translations: Translations,
}

impl NavItemDraft {
    pub fn from_item(item: &crate::models::NavItem) -> Self {
        Self {
            slug: item.slug.clone(),
            path: item.path.clone().unwrap_or_default(),
            url: item.url.clone().unwrap_or_default(),
            is_external: item.is_external,
            translations: normalize_translations(&item.translations),
        }
    }

    /// Validation for a new item. Slugs must be unique in `tree`.
    pub fn validate_create(&self, tree: &[FlatNode]) -> Result<ValidDraft, ValidationError> {
        let slug = self.slug.trim();
        if slug.is_empty() {
            return Err(ValidationError::EmptySlug);
        }
        if !is_valid_slug(slug) {
            return Err(ValidationError::InvalidSlug(slug.to_string()));
        }
        if contains_slug(tree, slug) {
            return Err(ValidationError::DuplicateSlug(slug.to_string()));
        }
        self.validate_link(slug.to_string())
    }

    /// Validation for an existing item. The slug is immutable and kept as-is.
    pub fn validate_update(&self, existing_slug: &str) -> Result<ValidDraft, ValidationError> {
        self.validate_link(existing_slug.to_string())
    }

    fn validate_link(&self, slug: String) -> Result<ValidDraft, ValidationError> {
        let (path, url) = if self.is_external {
            let url = self.url.trim();
            if url.is_empty() {
                return Err(ValidationError::MissingUrl);
            }
            (None, Some(url.to_string()))
        } else {
            (normalize_path(&self.path), None)
        };

        Ok(ValidDraft {
            slug,
            path,
            url,
            is_external: self.is_external,
            translations: normalize_translations(&self.translations),
        })
    }
}

pub(crate) fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn normalize_path(raw: &str) -> Option<String> {
    let p = raw.trim();
    if p.is_empty() {
        None
    } else if p.starts_with('/') {
        Some(p.to_string())
    } else {
        Some(format!("/{p}"))
    }
}

/// Exactly one trimmed entry per supported locale; unknown locales dropped.
pub(crate) fn normalize_translations(input: &Translations) -> Translations {
    Locale::all()
        .map(|l| {
            let v = input
                .get(l.code())
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            (l.code().to_string(), v)
        })
        .collect()
}

/// Text translation collaborator (AI provider behind the backend).
#[allow(async_fn_in_trait)]
pub(crate) trait Translator {
    async fn translate(&self, text: &str, from: Locale, to: Locale) -> Result<String, String>;
}

/// Fill every empty locale from the first non-empty title.
///
/// Returns the locales that could not be translated.
pub(crate) async fn fill_missing_translations<T: Translator>(
    draft: &mut NavItemDraft,
    translator: &T,
) -> Vec<Locale> {
    draft.translations = normalize_translations(&draft.translations);

    let source = std::iter::once(Locale::DEFAULT)
        .chain(Locale::all())
        .find_map(|l| {
            draft
                .translations
                .get(l.code())
                .filter(|s| !s.is_empty())
                .map(|s| (l, s.clone()))
        });
    let Some((from, text)) = source else {
        return Vec::new();
    };

    let mut failed = Vec::new();
    for to in Locale::all() {
        let empty = draft
            .translations
            .get(to.code())
            .map(|s| s.is_empty())
            .unwrap_or(true);
        if to == from || !empty {
            continue;
        }
        match translator.translate(&text, from, to).await {
            Ok(t) if !t.trim().is_empty() => {
                draft
                    .translations
                    .insert(to.code().to_string(), t.trim().to_string());
            }
            Ok(_) => failed.push(to),
            Err(e) => {
                warn!("translation {from} -> {to} failed: {e}");
                failed.push(to);
            }
        }
    }
    failed
}
