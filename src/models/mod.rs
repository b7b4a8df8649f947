use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Parent reference used by top-level nodes in the flat representation.
///
/// Backend ids are UUIDs, so this can never name a real item.
pub(crate) const ROOT_ID: &str = "__root__";

/// Locale code -> display title.
pub(crate) type Translations = BTreeMap<String, String>;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Locale {
    En,
    De,
}

impl Locale {
    /// Locale tried first when picking a label.
    pub const DEFAULT: Locale = Locale::En;
    /// Locale tried when the default title is empty.
    pub const FALLBACK: Locale = Locale::De;

    pub fn code(self) -> &'static str {
        self.into()
    }

    pub fn all() -> impl Iterator<Item = Locale> {
        Locale::iter()
    }
}

/// Navigation entry as the backend returns it (nested).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NavItem {
    pub id: String,

    #[serde(default)]
    pub parent_id: Option<String>,

    pub slug: String,

    /// Internal route, used when `is_external` is false.
    #[serde(default)]
    pub path: Option<String>,

    /// External link, used when `is_external` is true.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub is_external: bool,

    #[serde(default)]
    pub translations: Translations,

    /// 1-based position among siblings.
    #[serde(default)]
    pub order: u32,

    #[serde(default)]
    pub children: Vec<NavItem>,
}

impl NavItem {
    pub fn title(&self, locale: Locale) -> Option<&str> {
        self.translations
            .get(locale.code())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Display label: default locale, then fallback locale, then slug.
    pub fn label(&self) -> String {
        self.title(Locale::DEFAULT)
            .or_else(|| self.title(Locale::FALLBACK))
            .unwrap_or(self.slug.as_str())
            .to_string()
    }

    /// Link target as shown in the manager.
    pub fn href(&self) -> Option<&str> {
        if self.is_external {
            self.url.as_deref()
        } else {
            self.path.as_deref()
        }
        .filter(|s| !s.trim().is_empty())
    }

    /// Copy of this item without its subtree.
    pub fn detached(&self) -> NavItem {
        NavItem {
            children: Vec::new(),
            ..self.clone()
        }
    }
}

/// Node of the flat, parent-indexed tree used while dragging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FlatNode {
    pub id: String,
    /// Parent id, or [`ROOT_ID`] for top-level nodes.
    pub parent: String,
    pub text: String,
    pub droppable: bool,
    /// Item data without `children`.
    pub item: NavItem,
}

impl FlatNode {
    pub fn is_root_level(&self) -> bool {
        self.parent == ROOT_ID
    }
}

/// One row of the structure sync payload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructureEntry {
    pub id: String,
    pub parent_id: Option<String>,
    pub order: u32,
}
