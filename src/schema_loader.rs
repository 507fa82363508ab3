//! JSON Schema loading for category files.
//!
//! Category data is validated against `schema/category_items.schema.json`
//! before it is deserialized, so malformed files are reported with schema
//! paths instead of serde's first-error message. The canonical schema is
//! embedded at build time; a wardrobe may ship its own copy under
//! `schema/` to override it.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const CATEGORY_SCHEMA_FILE: &str = "schema/category_items.schema.json";

const EMBEDDED_CATEGORY_SCHEMA: &str = include_str!("../schema/category_items.schema.json");

/// Compiled validator for category files.
pub struct CategorySchema {
    compiled: JSONSchema,
    source: String,
}

impl std::fmt::Debug for CategorySchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategorySchema")
            .field("source", &self.source)
            .finish()
    }
}

impl CategorySchema {
    /// The schema compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let value: Value = serde_json::from_str(EMBEDDED_CATEGORY_SCHEMA)
            .context("parsing embedded category schema")?;
        Self::compile(value, "<embedded>".to_string())
    }

    /// Load and compile a schema from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_reader(
            File::open(path).with_context(|| format!("opening schema {}", path.display()))?,
        )
        .with_context(|| format!("parsing schema {}", path.display()))?;
        Self::compile(value, path.display().to_string())
    }

    /// Prefer `<root>/schema/category_items.schema.json`, falling back to the
    /// embedded copy when the wardrobe does not ship one.
    pub fn for_root(root: &Path) -> Result<Self> {
        let candidate = resolve_category_schema_path(root);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Self::embedded()
        }
    }

    fn compile(value: Value, source: String) -> Result<Self> {
        let compiled = JSONSchema::compile(&value)
            .map_err(|err| anyhow!("compiling schema {source}: {err}"))?;
        Ok(Self { compiled, source })
    }

    /// Where this schema came from, for log messages.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Validate a parsed category file, joining every violation into one error.
    pub fn validate(&self, instance: &Value, label: &str) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| format!("{} at {}", err, err.instance_path))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("{label} failed schema validation:\n{details}");
        }
        Ok(())
    }
}

pub fn resolve_category_schema_path(root: &Path) -> PathBuf {
    root.join(CATEGORY_SCHEMA_FILE)
}
