use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const IMAGE_SUFFIX: &str = ".png";

/// Stable identifier for a single wardrobe item (e.g., `hat1_4.png`).
///
/// Ids are unique across the whole wardrobe, not just within a category, so
/// presets and toggles can address an item without naming its file.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Normalize a raw catalog id so it always carries the image suffix.
    pub fn normalized(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.ends_with(IMAGE_SUFFIX) {
            ItemId(trimmed.to_string())
        } else {
            ItemId(format!("{trimmed}{IMAGE_SUFFIX}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a mutually exclusive item group (e.g., `hat1`, `face2`, `base`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CategoryName(String);

/// How the visibility engine treats a category.
///
/// `Base` and `Face` are the always-visible groups; everything else is
/// `Regular` and may be fully hidden.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CategoryKind {
    Base,
    Face,
    Regular,
}

impl CategoryName {
    /// Category names are case-insensitive; `Base.json` and `base.json` name
    /// the same group.
    pub fn new(raw: &str) -> Self {
        CategoryName(raw.trim().to_ascii_lowercase())
    }

    /// Derive the category from a catalog file name by dropping `.json`.
    pub fn from_file(file: &str) -> Self {
        let name = file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(file)
            .trim()
            .to_ascii_lowercase();
        let stem = name.strip_suffix(".json").unwrap_or(&name);
        CategoryName(stem.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> CategoryKind {
        if self.0 == "base" {
            CategoryKind::Base
        } else if self.0.starts_with("face") {
            CategoryKind::Face
        } else {
            CategoryKind::Regular
        }
    }

    /// True for base and face groups, which must never end up fully hidden.
    pub fn is_required(&self) -> bool {
        !matches!(self.kind(), CategoryKind::Regular)
    }

    /// Category name without its trailing variant digits (`hat2` -> `hat`).
    pub fn family(&self) -> &str {
        self.0.trim_end_matches(|c: char| c.is_ascii_digit())
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CategoryName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(&value))
    }
}
