//! Shared library for the dress-up wardrobe.
//!
//! The crate loads per-category item catalogs, keeps the visible outfit
//! consistent (one item per category, base and face always shown), applies
//! named presets, and renders the result as a z-ordered stage. The `dressup`
//! binary is a thin CLI over the functions exported here.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod config;
pub mod engine;
pub mod loader;
pub mod preset;
pub mod schema_loader;
pub mod stage;

pub use catalog::{Category, CategoryKind, CategoryName, Item, ItemId, Wardrobe};
pub use config::{FacePolicy, LayerOrder, MANIFEST_FILE, WardrobeConfig};
pub use engine::{Dresser, PresetReport, ToggleOutcome};
pub use loader::{CatalogLoader, DirSource, ItemSource, LoadReport, MemorySource, dir_loader};
pub use preset::{Preset, PresetBook, Selection};
pub use schema_loader::CategorySchema;
pub use stage::{ControlButton, ControlGroup, Layer, Stage};

/// Returns true when `candidate` holds a wardrobe manifest.
fn is_wardrobe_root(candidate: &Path) -> bool {
    candidate.join(MANIFEST_FILE).is_file()
}

/// Accepts an explicit root hint only when it is an existing directory.
fn root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.trim().is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.is_dir() {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_wardrobe_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the wardrobe directory.
///
/// Honors `DRESSUP_ROOT` first (a directory without a manifest is accepted
/// and loads with defaults), then climbs from the current directory looking
/// for `wardrobe.json`, then falls back to the build-time hint.
pub fn find_wardrobe_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var("DRESSUP_ROOT") {
        if let Some(root) = root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    if let Some(hint) = option_env!("DRESSUP_ROOT_HINT") {
        if let Some(root) = root_from_hint(hint).filter(|root| is_wardrobe_root(root)) {
            return Ok(root);
        }
    }

    bail!("Unable to locate a wardrobe. Set DRESSUP_ROOT or pass --root to a directory with wardrobe.json.");
}

/// Split comma- or whitespace-delimited lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// A loaded wardrobe ready for interaction.
pub struct Session {
    pub root: PathBuf,
    pub config: WardrobeConfig,
    pub dresser: Dresser,
    pub report: LoadReport,
}

impl Session {
    /// Read the manifest under `root` (plus env overrides) and load every
    /// category in batches.
    pub async fn open(root: &Path) -> Result<Self> {
        let config = WardrobeConfig::load(root)?.with_env_overrides()?;
        Self::open_with(root, config).await
    }

    pub async fn open_with(root: &Path, config: WardrobeConfig) -> Result<Self> {
        let loader = dir_loader(root, &config)?;
        let (wardrobe, report) = loader.load_in_batches(&config.category_files).await;
        let dresser = Dresser::new(wardrobe, config.face_policy);
        Ok(Session {
            root: root.to_path_buf(),
            config,
            dresser,
            report,
        })
    }

    pub fn apply_preset(&mut self, name: &str) -> Result<PresetReport> {
        self.dresser.apply_named_preset(&self.config.presets, name)
    }

    pub fn stage(&self) -> Stage {
        Stage::render(&self.dresser, &self.config.layer_order)
    }
}
