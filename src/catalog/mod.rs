//! Wardrobe catalog wiring.
//!
//! Each category lives in its own JSON file (`hat1.json`, `Base.json`, ...).
//! Types here mirror that file format; callers use `Wardrobe` for id lookups
//! once every category has been loaded.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{CategoryKind, CategoryName, ItemId};
pub use index::Wardrobe;
pub use model::{Category, Item, ItemRecord, items_from_value};
