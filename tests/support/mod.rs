#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn dressup_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dressup"))
}

pub fn demo_wardrobe() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join("wardrobe")
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// `count` items named `<category>_<n>` with `images/` sources.
pub fn items(category: &str, count: usize) -> Value {
    Value::Array(
        (1..=count)
            .map(|n| {
                json!({
                    "id": format!("{category}_{n}"),
                    "src": format!("images/{category}_{n}.png"),
                    "alt": format!("{category} {n}"),
                })
            })
            .collect(),
    )
}

pub fn write_json(root: &Path, file: &str, value: &Value) -> Result<()> {
    let path = root.join(file);
    fs::write(&path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// A small wardrobe on disk: base, two face groups, two hats, one bag, one
/// scarf, and two presets.
pub fn small_wardrobe() -> Result<TempDir> {
    let dir = TempDir::new().context("failed to allocate wardrobe dir")?;
    let root = dir.path();
    write_json(
        root,
        "Base.json",
        &json!([{"id": "base", "src": "images/base.png", "alt": "Body"}]),
    )?;
    write_json(root, "face1.json", &items("face1", 3))?;
    write_json(root, "face2.json", &items("face2", 2))?;
    write_json(root, "hat1.json", &items("hat1", 4))?;
    write_json(root, "hat2.json", &items("hat2", 3))?;
    write_json(root, "bag1.json", &items("bag1", 4))?;
    write_json(root, "scarf1.json", &items("scarf1", 2))?;
    write_json(
        root,
        "wardrobe.json",
        &json!({
            "categories": [
                "Base.json", "face1.json", "face2.json",
                "hat1.json", "hat2.json", "bag1.json", "scarf1.json"
            ],
            "batch_size": 2,
            "batch_delay_ms": 0,
            "presets": {
                "birthday": [
                    {"category": "hat1", "item": "hat1_4"},
                    {"category": "hat2", "item": "hat2_1"},
                    {"category": "bag1", "item": "bag1_1"}
                ],
                "halloween": [
                    {"category": "hat1", "item": "hat1_1"},
                    {"category": "scarf1", "item": "scarf1_2"}
                ]
            }
        }),
    )?;
    Ok(dir)
}
