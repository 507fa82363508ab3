//! Wardrobe manifest (`wardrobe.json`) and environment overrides.
//!
//! Every manifest field is optional; a missing field falls back to the stock
//! wardrobe layout (seventeen category files, batches of three with a 10ms
//! pause). `DRESSUP_BATCH_SIZE`, `DRESSUP_BATCH_DELAY_MS`, and
//! `DRESSUP_FACE_POLICY` override the manifest after it is read.

use crate::catalog::CategoryName;
use crate::preset::{PresetBook, Selection};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const MANIFEST_FILE: &str = "wardrobe.json";

const DEFAULT_BATCH_SIZE: usize = 3;
const DEFAULT_BATCH_DELAY_MS: u64 = 10;

const DEFAULT_CATEGORY_FILES: &[&str] = &[
    "backpack1.json",
    "backpack2.json",
    "Base.json",
    "face1.json",
    "face2.json",
    "bag1.json",
    "bag2.json",
    "bow1.json",
    "dress1.json",
    "dress2.json",
    "hat1.json",
    "hat2.json",
    "scarf1.json",
    "scarf2.json",
    "shoes1.json",
    "shoes2.json",
    "socks1.json",
];

const DEFAULT_LAYER_ORDER: &[(&str, i32)] = &[
    ("backpack", 1),
    ("base", 2),
    ("face", 3),
    ("dress", 4),
    ("socks", 5),
    ("shoes", 6),
    ("scarf", 7),
    ("bow", 8),
    ("bag", 9),
    ("hat", 10),
];

/// How face groups react when the user hides their visible item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacePolicy {
    /// Hiding the active face item is refused; picking another item swaps.
    #[default]
    KeepActive,
    /// Hiding is allowed, then the group's first item is revealed.
    RevealFirst,
}

impl FacePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacePolicy::KeepActive => "keep_active",
            FacePolicy::RevealFirst => "reveal_first",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "keep_active" => Ok(FacePolicy::KeepActive),
            "reveal_first" => Ok(FacePolicy::RevealFirst),
            other => bail!("Unknown face policy: {other} (expected keep_active|reveal_first)"),
        }
    }
}

/// Stacking order keyed by category family (`hat2` stacks as `hat`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerOrder(BTreeMap<String, i32>);

impl Default for LayerOrder {
    fn default() -> Self {
        LayerOrder(
            DEFAULT_LAYER_ORDER
                .iter()
                .map(|(family, z)| (family.to_string(), *z))
                .collect(),
        )
    }
}

impl LayerOrder {
    /// Unknown families sit at the bottom of the stack.
    pub fn z_index(&self, category: &CategoryName) -> i32 {
        self.0.get(category.family()).copied().unwrap_or(0)
    }

    fn extend(&mut self, overrides: BTreeMap<String, i32>) {
        for (family, z) in overrides {
            self.0.insert(family.to_ascii_lowercase(), z);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    categories: Option<Vec<String>>,
    #[serde(default)]
    batch_size: Option<usize>,
    #[serde(default)]
    batch_delay_ms: Option<u64>,
    #[serde(default)]
    face_policy: Option<FacePolicy>,
    #[serde(default)]
    layer_order: BTreeMap<String, i32>,
    #[serde(default)]
    presets: BTreeMap<String, Vec<Selection>>,
    #[serde(default)]
    validate_schema: Option<bool>,
}

#[derive(Clone, Debug)]
/// Resolved wardrobe configuration.
pub struct WardrobeConfig {
    pub category_files: Vec<String>,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub face_policy: FacePolicy,
    pub layer_order: LayerOrder,
    pub presets: PresetBook,
    pub validate_schema: bool,
}

impl Default for WardrobeConfig {
    fn default() -> Self {
        WardrobeConfig {
            category_files: DEFAULT_CATEGORY_FILES
                .iter()
                .map(|file| file.to_string())
                .collect(),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            face_policy: FacePolicy::default(),
            layer_order: LayerOrder::default(),
            presets: PresetBook::default(),
            validate_schema: true,
        }
    }
}

impl WardrobeConfig {
    /// Parse a manifest body, filling unspecified fields with defaults.
    pub fn from_manifest_str(data: &str) -> Result<Self> {
        let raw: RawManifest = serde_json::from_str(data).context("invalid wardrobe manifest")?;
        let mut config = WardrobeConfig::default();
        if let Some(files) = raw.categories {
            if files.iter().any(|file| file.trim().is_empty()) {
                bail!("manifest categories must not contain empty entries");
            }
            config.category_files = files;
        }
        if let Some(size) = raw.batch_size {
            config.batch_size = validate_batch_size(size)?;
        }
        if let Some(ms) = raw.batch_delay_ms {
            config.batch_delay = Duration::from_millis(ms);
        }
        if let Some(policy) = raw.face_policy {
            config.face_policy = policy;
        }
        config.layer_order.extend(raw.layer_order);
        config.presets = PresetBook::from_map(raw.presets);
        if let Some(validate) = raw.validate_schema {
            config.validate_schema = validate;
        }
        Ok(config)
    }

    /// Load `<root>/wardrobe.json`; a root without a manifest uses defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        if !path.is_file() {
            debug!(root = %root.display(), "no wardrobe manifest; using defaults");
            return Ok(WardrobeConfig::default());
        }
        let data =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_manifest_str(&data).with_context(|| format!("loading {}", path.display()))
    }

    /// Apply `DRESSUP_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(raw) = get("DRESSUP_BATCH_SIZE") {
            let size: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("DRESSUP_BATCH_SIZE must be an integer, got {raw}"))?;
            self.batch_size = validate_batch_size(size)?;
        }
        if let Some(raw) = get("DRESSUP_BATCH_DELAY_MS") {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("DRESSUP_BATCH_DELAY_MS must be an integer, got {raw}"))?;
            self.batch_delay = Duration::from_millis(ms);
        }
        if let Some(raw) = get("DRESSUP_FACE_POLICY") {
            self.face_policy = FacePolicy::parse(&raw)?;
        }
        Ok(self)
    }
}

fn validate_batch_size(size: usize) -> Result<usize> {
    if size == 0 {
        bail!("batch_size must be at least 1");
    }
    Ok(size)
}
