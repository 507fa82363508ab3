//! Catalog loader: fetches category files in small concurrent batches.
//!
//! Each batch is fetched with `join_all` on the current task and followed by
//! a short pause, which paces how quickly layers appear. The pause is purely
//! cosmetic; results are kept in manifest order regardless of which fetch
//! finishes first. A category that cannot be fetched, parsed, or validated is
//! logged and loaded as empty so the rest of the wardrobe still renders.

use crate::catalog::{Category, CategoryName, Item, Wardrobe, items_from_value};
use crate::config::WardrobeConfig;
use crate::schema_loader::CategorySchema;
use anyhow::{Context, Result};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

/// Where category file bytes come from.
pub trait ItemSource {
    fn fetch(&self, file: &str) -> impl Future<Output = Result<Vec<u8>>>;
}

/// Reads category files relative to a wardrobe directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }
}

impl ItemSource for DirSource {
    async fn fetch(&self, file: &str) -> Result<Vec<u8>> {
        let path = self.root.join(file);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Error loading file: {}", path.display()))
    }
}

/// In-memory source keyed by file name; files not present fail to fetch.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn insert(&mut self, file: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.files.insert(file.into(), body.into());
    }
}

impl ItemSource for MemorySource {
    async fn fetch(&self, file: &str) -> Result<Vec<u8>> {
        self.files
            .get(file)
            .cloned()
            .with_context(|| format!("Error loading file: {file}"))
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
/// Per-file load result.
pub struct LoadedCategory {
    pub file: String,
    pub category: CategoryName,
    pub items: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FailedCategory {
    pub file: String,
    pub error: String,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
/// Summary of a batched load; failures are reported, not raised.
pub struct LoadReport {
    pub loaded: Vec<LoadedCategory>,
    pub failed: Vec<FailedCategory>,
    pub batches: usize,
}

pub struct CatalogLoader<S> {
    source: S,
    schema: Option<CategorySchema>,
    batch_size: usize,
    batch_delay: Duration,
}

impl<S: ItemSource> CatalogLoader<S> {
    pub fn new(source: S) -> Self {
        let defaults = WardrobeConfig::default();
        CatalogLoader {
            source,
            schema: None,
            batch_size: defaults.batch_size,
            batch_delay: defaults.batch_delay,
        }
    }

    /// Validate every fetched file against `schema` before deserializing it.
    pub fn with_schema(mut self, schema: CategorySchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// A zero batch size is treated as one.
    pub fn with_batching(mut self, batch_size: usize, batch_delay: Duration) -> Self {
        self.batch_size = batch_size.max(1);
        self.batch_delay = batch_delay;
        self
    }

    /// Fetch and parse one category file, surfacing every failure.
    pub async fn load_category_strict(&self, file: &str) -> Result<Vec<Item>> {
        let category = CategoryName::from_file(file);
        let bytes = self.source.fetch(file).await?;
        let value: Value =
            serde_json::from_slice(&bytes).with_context(|| format!("parsing {file}"))?;
        if let Some(schema) = &self.schema {
            schema.validate(&value, file)?;
        }
        items_from_value(value, &category).with_context(|| format!("loading {file}"))
    }

    /// Fetch and parse one category file; failures are logged and yield an
    /// empty list.
    pub async fn load_category(&self, file: &str) -> Vec<Item> {
        self.load_category_logged(file).await.0
    }

    async fn load_category_logged(&self, file: &str) -> (Vec<Item>, Option<String>) {
        match self.load_category_strict(file).await {
            Ok(items) => (items, None),
            Err(err) => {
                error!(file, "Failed to load category: {err:#}");
                (Vec::new(), Some(format!("{err:#}")))
            }
        }
    }

    /// Load every file in order, `batch_size` at a time, pausing between
    /// batches.
    pub async fn load_in_batches(&self, files: &[String]) -> (Wardrobe, LoadReport) {
        let mut categories = Vec::with_capacity(files.len());
        let mut report = LoadReport::default();

        for (batch_idx, batch) in files.chunks(self.batch_size).enumerate() {
            if batch_idx > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
            debug!(batch = batch_idx, files = ?batch, "loading batch");

            let results = join_all(batch.iter().map(|file| self.load_category_logged(file))).await;
            report.batches += 1;

            for (file, (items, failure)) in batch.iter().zip(results) {
                let mut category = Category::empty(file);
                match failure {
                    Some(error) => report.failed.push(FailedCategory {
                        file: file.clone(),
                        error,
                    }),
                    None => report.loaded.push(LoadedCategory {
                        file: file.clone(),
                        category: category.name.clone(),
                        items: items.len(),
                    }),
                }
                category.items = items;
                categories.push(category);
            }
        }

        info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            batches = report.batches,
            "wardrobe loaded"
        );
        (Wardrobe::from_categories(categories), report)
    }
}

/// Build a loader for a wardrobe directory using its resolved configuration.
pub fn dir_loader(root: &Path, config: &WardrobeConfig) -> Result<CatalogLoader<DirSource>> {
    let mut loader = CatalogLoader::new(DirSource::new(root))
        .with_batching(config.batch_size, config.batch_delay);
    if config.validate_schema {
        let schema = CategorySchema::for_root(root)?;
        debug!(schema = schema.source(), "validating category files");
        loader = loader.with_schema(schema);
    }
    Ok(loader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn source() -> MemorySource {
        let mut source = MemorySource::default();
        source.insert(
            "Base.json",
            body(json!([{"id": "base_1", "src": "img/base_1.png", "alt": "Body"}])),
        );
        source.insert(
            "hat1.json",
            body(json!([
                {"id": "hat1_1", "src": "img/hat1_1.png", "alt": "Hat"},
                {"id": "hat1_2", "src": "img/hat1_2.png", "alt": "Hat", "visibility": "visible"}
            ])),
        );
        source.insert("bag1.json", b"{not json".to_vec());
        source.insert(
            "bow1.json",
            body(json!([{"id": "bow1_1", "alt": "Bow"}])),
        );
        source
    }

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn failed_fetch_yields_empty_category() {
        let loader = CatalogLoader::new(source());
        assert!(loader.load_category("missing.json").await.is_empty());
        assert!(loader.load_category("bag1.json").await.is_empty());
        assert_eq!(loader.load_category("hat1.json").await.len(), 2);

        let err = loader.load_category_strict("missing.json").await.unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[tokio::test]
    async fn schema_rejects_items_missing_src() {
        let loader = CatalogLoader::new(source()).with_schema(CategorySchema::embedded().unwrap());
        let err = loader.load_category_strict("bow1.json").await.unwrap_err();
        assert!(format!("{err:#}").contains("schema validation"));

        let lenient = CatalogLoader::new(source());
        assert!(lenient.load_category_strict("bow1.json").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn batches_preserve_manifest_order_and_report_failures() {
        let loader = CatalogLoader::new(source()).with_batching(2, Duration::from_millis(10));
        let started = tokio::time::Instant::now();
        let (wardrobe, report) = loader
            .load_in_batches(&files(&[
                "hat1.json",
                "bag1.json",
                "Base.json",
                "nope.json",
                "bow1.json",
            ]))
            .await;

        assert_eq!(report.batches, 3);
        assert!(started.elapsed() >= Duration::from_millis(20));
        let names: Vec<_> = wardrobe
            .categories()
            .iter()
            .map(|category| category.name.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["hat1", "bag1", "base", "nope", "bow1"]);
        assert_eq!(
            report.loaded.iter().map(|c| c.file.as_str()).collect::<Vec<_>>(),
            vec!["hat1.json", "Base.json"]
        );
        assert_eq!(
            report.failed.iter().map(|c| c.file.as_str()).collect::<Vec<_>>(),
            vec!["bag1.json", "nope.json", "bow1.json"]
        );
        assert_eq!(wardrobe.len(), 3);
    }

    #[tokio::test]
    async fn default_config_validates_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("hat1.json"),
            r#"[{"id": "hat1_1", "src": "img/hat1_1.png", "alt": "Hat"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("bow1.json"), r#"[{"id": "bow1_1", "alt": "Bow"}]"#)
            .unwrap();

        let config = WardrobeConfig::default();
        assert!(config.validate_schema);
        let loader = dir_loader(dir.path(), &config).unwrap();
        assert_eq!(loader.load_category_strict("hat1.json").await.unwrap().len(), 1);
        let err = loader.load_category_strict("bow1.json").await.unwrap_err();
        assert!(format!("{err:#}").contains("schema validation"));
    }

    #[tokio::test]
    async fn zero_batch_size_is_clamped() {
        let loader = CatalogLoader::new(source()).with_batching(0, Duration::ZERO);
        let (_, report) = loader.load_in_batches(&files(&["hat1.json", "Base.json"])).await;
        assert_eq!(report.batches, 2);
    }
}
