//! Catalog records shared by every layer.
use serde::{Deserialize, Serialize};

/// Icons a category may carry. Unknown names fall back to [`CategoryIcon::Sword`].
pub const CATEGORY_ICONS: [&str; 5] = ["Sword", "Activity", "Zap", "Target", "Ghost"];

/// Icon used when a category form is reset.
pub const DEFAULT_CATEGORY_ICON: &str = "Sword";

/// A browsable group of maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub image: String,
}

/// A single map with its hidden access code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEntry {
    pub id: String,
    pub category_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    pub code: String,
}

/// Category record without an id, as submitted to the store on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub title: String,
    pub icon: String,
    pub image: String,
}

impl Default for CategoryDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            icon: DEFAULT_CATEGORY_ICON.to_string(),
            image: String::new(),
        }
    }
}

/// Map record without an id, as submitted to the store on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDraft {
    pub category_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub code: String,
}

/// Partial category update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Partial map update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

fn default_icon() -> String {
    DEFAULT_CATEGORY_ICON.to_string()
}

impl Category {
    #[must_use]
    pub fn from_draft(id: impl Into<String>, draft: CategoryDraft) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            icon: draft.icon,
            image: draft.image,
        }
    }

    /// Draft holding this record's editable fields.
    #[must_use]
    pub fn to_draft(&self) -> CategoryDraft {
        CategoryDraft {
            title: self.title.clone(),
            icon: self.icon.clone(),
            image: self.image.clone(),
        }
    }

    pub fn apply(&mut self, patch: CategoryPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
    }
}

impl MapEntry {
    #[must_use]
    pub fn from_draft(id: impl Into<String>, draft: MapDraft) -> Self {
        Self {
            id: id.into(),
            category_id: draft.category_id,
            title: draft.title,
            description: draft.description,
            thumbnail: draft.thumbnail,
            code: draft.code,
        }
    }

    #[must_use]
    pub fn to_draft(&self) -> MapDraft {
        MapDraft {
            category_id: self.category_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            thumbnail: self.thumbnail.clone(),
            code: self.code.clone(),
        }
    }

    pub fn apply(&mut self, patch: MapPatch) {
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(thumbnail) = patch.thumbnail {
            self.thumbnail = thumbnail;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
    }

    /// Case-insensitive match against title or description.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

impl From<CategoryDraft> for CategoryPatch {
    fn from(draft: CategoryDraft) -> Self {
        Self {
            title: Some(draft.title),
            icon: Some(draft.icon),
            image: Some(draft.image),
        }
    }
}

impl From<MapDraft> for MapPatch {
    fn from(draft: MapDraft) -> Self {
        Self {
            category_id: Some(draft.category_id),
            title: Some(draft.title),
            description: Some(draft.description),
            thumbnail: Some(draft.thumbnail),
            code: Some(draft.code),
        }
    }
}

/// Category icon names understood by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryIcon {
    Sword,
    Activity,
    Zap,
    Target,
    Ghost,
}

impl CategoryIcon {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Activity" => Self::Activity,
            "Zap" => Self::Zap,
            "Target" => Self::Target,
            "Ghost" => Self::Ghost,
            _ => Self::Sword,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sword => "Sword",
            Self::Activity => "Activity",
            Self::Zap => "Zap",
            Self::Target => "Target",
            Self::Ghost => "Ghost",
        }
    }
}

/// Keep only maps matching `query`, preserving order.
#[must_use]
pub fn filter_maps<'a>(maps: &'a [MapEntry], query: &str) -> Vec<&'a MapEntry> {
    maps.iter().filter(|map| map.matches_query(query)).collect()
}
