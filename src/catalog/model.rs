//! Deserializable representation of one category file (e.g., `hat1.json`).
//!
//! A category file is a JSON array of `{id, src, alt, visibility?}` records.
//! `ItemRecord` mirrors that wire shape; `Item` is the normalized form the
//! visibility engine works with.

use crate::catalog::identity::{CategoryKind, CategoryName, ItemId};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const VISIBLE: &str = "visible";

#[derive(Clone, Debug, Deserialize)]
/// One entry of a category file as stored on disk.
pub struct ItemRecord {
    pub id: String,
    pub src: String,
    pub alt: String,
    #[serde(default)]
    pub visibility: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A wardrobe item with its current visibility.
pub struct Item {
    pub id: ItemId,
    pub src: String,
    pub alt: String,
    pub category: CategoryName,
    pub visible: bool,
}

impl Item {
    /// Build an item from its record. Base items always start visible;
    /// everything else is hidden unless flagged `"visible"`.
    pub fn from_record(record: ItemRecord, category: &CategoryName) -> Self {
        let visible = category.kind() == CategoryKind::Base
            || record.visibility.as_deref() == Some(VISIBLE);
        Item {
            id: ItemId::normalized(&record.id),
            src: record.src,
            alt: record.alt,
            category: category.clone(),
            visible,
        }
    }
}

#[derive(Clone, Debug)]
/// A loaded category: its name, the file it came from, and its items in file
/// order.
pub struct Category {
    pub name: CategoryName,
    pub file: String,
    pub items: Vec<Item>,
}

impl Category {
    pub fn empty(file: &str) -> Self {
        Category {
            name: CategoryName::from_file(file),
            file: file.to_string(),
            items: Vec::new(),
        }
    }
}

/// Turn an already-parsed JSON array into items for `category`.
pub fn items_from_value(value: Value, category: &CategoryName) -> Result<Vec<Item>> {
    let records: Vec<ItemRecord> = serde_json::from_value(value)
        .with_context(|| format!("category {category} is not an array of item records"))?;
    Ok(records
        .into_iter()
        .map(|record| Item::from_record(record, category))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_default_to_hidden() {
        let category = CategoryName::new("hat1");
        let items = items_from_value(
            json!([
                {"id": "hat1_1", "src": "img/hat1_1.png", "alt": "Red hat"},
                {"id": "hat1_2.png", "src": "img/hat1_2.png", "alt": "Blue hat", "visibility": "visible"},
                {"id": "hat1_3", "src": "img/hat1_3.png", "alt": "Cap", "visibility": "hidden"}
            ]),
            &category,
        )
        .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id.0, "hat1_1.png");
        assert!(!items[0].visible);
        assert!(items[1].visible);
        assert!(!items[2].visible);
        assert!(items.iter().all(|item| item.category == category));
    }

    #[test]
    fn base_items_are_forced_visible() {
        let category = CategoryName::new("base");
        let items = items_from_value(
            json!([{"id": "base1", "src": "img/base1.png", "alt": "Body", "visibility": "hidden"}]),
            &category,
        )
        .unwrap();
        assert!(items[0].visible);
    }

    #[test]
    fn non_array_payload_is_rejected() {
        let category = CategoryName::new("bag1");
        let err = items_from_value(json!({"id": "bag1_1"}), &category).unwrap_err();
        assert!(format!("{err:#}").contains("bag1"));
    }
}
