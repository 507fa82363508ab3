// Library-level integration suite: loads wardrobes from disk and drives the
// visibility engine end to end so changes to loading, invariants, presets,
// and stage rendering surface in one place.
mod support;

use anyhow::Result;
use dressup::{
    CategoryKind, CategoryName, Dresser, FacePolicy, ItemId, Session, Stage, ToggleOutcome,
    WardrobeConfig,
};
use serde_json::json;
use std::fs;
use support::{demo_wardrobe, items, small_wardrobe, write_json};

fn id(raw: &str) -> ItemId {
    ItemId::normalized(raw)
}

fn cat(raw: &str) -> CategoryName {
    CategoryName::new(raw)
}

fn assert_invariants(dresser: &Dresser) {
    for category in dresser.wardrobe().categories() {
        let visible = category.items.iter().filter(|item| item.visible).count();
        match category.name.kind() {
            CategoryKind::Base => assert_eq!(visible, 1, "base must show exactly one item"),
            CategoryKind::Face if !category.items.is_empty() => {
                assert!(visible >= 1, "{} has no visible item", category.name)
            }
            CategoryKind::Face => {}
            CategoryKind::Regular => assert!(visible <= 1, "{} stacks items", category.name),
        }
    }
}

fn regular_visible(dresser: &Dresser) -> Vec<String> {
    dresser
        .visible_items()
        .into_iter()
        .filter(|item| !item.category.is_required())
        .map(|item| item.id.0.clone())
        .collect()
}

#[tokio::test]
async fn loads_wardrobe_from_disk_with_invariants() -> Result<()> {
    let dir = small_wardrobe()?;
    let session = Session::open(dir.path()).await?;

    assert!(session.report.failed.is_empty());
    assert_eq!(session.report.loaded.len(), 7);
    assert_eq!(session.report.batches, 4);
    assert_eq!(session.dresser.wardrobe().len(), 1 + 3 + 2 + 4 + 3 + 4 + 2);
    assert!(session.dresser.is_visible(&id("base")));
    assert!(session.dresser.is_visible(&id("face1_1")));
    assert!(session.dresser.is_visible(&id("face2_1")));
    assert!(regular_visible(&session.dresser).is_empty());
    assert_invariants(&session.dresser);
    Ok(())
}

#[tokio::test]
async fn failed_category_does_not_block_others() -> Result<()> {
    let dir = small_wardrobe()?;
    fs::write(dir.path().join("hat2.json"), "[{\"id\": ")?;
    fs::remove_file(dir.path().join("scarf1.json"))?;

    let session = Session::open(dir.path()).await?;
    let failed: Vec<_> = session
        .report
        .failed
        .iter()
        .map(|failure| failure.file.as_str())
        .collect();
    assert_eq!(failed, vec!["hat2.json", "scarf1.json"]);

    let wardrobe = session.dresser.wardrobe();
    assert!(wardrobe.category(&cat("hat2")).unwrap().items.is_empty());
    assert!(wardrobe.category(&cat("scarf1")).unwrap().items.is_empty());
    assert_eq!(wardrobe.category(&cat("hat1")).unwrap().items.len(), 4);

    let stage = session.stage();
    assert!(stage.layers.iter().all(|layer| layer.category != cat("hat2")));
    Ok(())
}

#[tokio::test]
async fn schema_violations_count_as_failed_fetches() -> Result<()> {
    let dir = small_wardrobe()?;
    write_json(
        dir.path(),
        "bag1.json",
        &json!([{"id": "bag1_1", "src": "images/bag1_1.png", "alt": "Bag", "visibility": "maybe"}]),
    )?;

    let session = Session::open(dir.path()).await?;
    assert_eq!(session.report.failed.len(), 1);
    assert!(session.report.failed[0].error.contains("schema validation"));

    let mut config = WardrobeConfig::load(dir.path())?;
    config.validate_schema = false;
    let lenient = Session::open_with(dir.path(), config).await?;
    assert!(lenient.report.failed.is_empty());
    assert!(!lenient.dresser.is_visible(&id("bag1_1")));
    Ok(())
}

#[tokio::test]
async fn toggles_keep_categories_exclusive() -> Result<()> {
    let dir = small_wardrobe()?;
    let mut session = Session::open(dir.path()).await?;
    let dresser = &mut session.dresser;

    for pick in ["hat1_1", "hat1_2", "hat1_4"] {
        assert_eq!(dresser.toggle(&id(pick), &cat("hat1")), ToggleOutcome::Shown);
        assert_invariants(dresser);
    }
    assert_eq!(regular_visible(dresser), vec!["hat1_4.png"]);

    assert_eq!(dresser.toggle(&id("base"), &cat("base")), ToggleOutcome::Refused);
    assert_eq!(dresser.toggle(&id("face2_1"), &cat("face2")), ToggleOutcome::Refused);
    assert_eq!(dresser.toggle(&id("face2_2"), &cat("face2")), ToggleOutcome::Shown);
    assert!(!dresser.is_visible(&id("face2_1")));
    assert_invariants(dresser);
    Ok(())
}

#[tokio::test]
async fn reveal_first_policy_never_blanks_a_face() -> Result<()> {
    let dir = small_wardrobe()?;
    let mut config = WardrobeConfig::load(dir.path())?;
    config.face_policy = FacePolicy::RevealFirst;
    let mut session = Session::open_with(dir.path(), config).await?;
    let dresser = &mut session.dresser;

    dresser.toggle(&id("face1_3"), &cat("face1"));
    assert_eq!(
        dresser.toggle(&id("face1_3"), &cat("face1")),
        ToggleOutcome::Hidden
    );
    assert!(dresser.is_visible(&id("face1_1")));
    assert!(!dresser.is_visible(&id("face1_3")));
    assert_invariants(dresser);
    Ok(())
}

#[tokio::test]
async fn switching_presets_resets_previous_selection() -> Result<()> {
    let dir = small_wardrobe()?;
    let mut session = Session::open(dir.path()).await?;

    session.apply_preset("birthday")?;
    assert_eq!(
        regular_visible(&session.dresser),
        vec!["hat1_4.png", "hat2_1.png", "bag1_1.png"]
    );

    session.dresser.toggle(&id("scarf1_1"), &cat("scarf1"));
    let report = session.apply_preset("halloween")?;
    assert_eq!(report.shown, vec![id("hat1_1"), id("scarf1_2")]);
    assert_eq!(
        regular_visible(&session.dresser),
        vec!["hat1_1.png", "scarf1_2.png"]
    );
    assert_eq!(session.dresser.active_preset(), Some("halloween"));
    assert_invariants(&session.dresser);

    session.apply_preset("halloween")?;
    assert_eq!(
        regular_visible(&session.dresser),
        vec!["hat1_1.png", "scarf1_2.png"]
    );

    assert!(session.apply_preset("gala").is_err());
    session.dresser.reset_preset();
    assert!(regular_visible(&session.dresser).is_empty());
    assert_eq!(session.dresser.active_preset(), None);
    Ok(())
}

#[tokio::test]
async fn stage_orders_layers_and_exposes_controls() -> Result<()> {
    let dir = small_wardrobe()?;
    write_json(dir.path(), "backpack1.json", &items("backpack1", 1))?;
    let mut config = WardrobeConfig::load(dir.path())?;
    config.category_files.push("backpack1.json".to_string());
    let mut session = Session::open_with(dir.path(), config).await?;
    session.dresser.toggle(&id("backpack1_1"), &cat("backpack1"));
    session.dresser.toggle(&id("hat2_2"), &cat("hat2"));

    let stage: Stage = session.stage();
    let visible: Vec<_> = stage
        .visible_layers()
        .map(|layer| layer.id.0.as_str())
        .collect();
    assert_eq!(
        visible,
        vec!["backpack1_1.png", "base.png", "face1_1.png", "face2_1.png", "hat2_2.png"]
    );
    assert!(stage.controls.iter().all(|group| group.category != cat("base")));
    let hat_button = stage
        .controls
        .iter()
        .flat_map(|group| group.buttons.iter())
        .find(|button| button.target == id("hat2_2"))
        .expect("hat2_2 button");
    assert_eq!(hat_button.src, "images/hat2_2b.png");
    Ok(())
}

#[tokio::test]
async fn demo_wardrobe_loads_and_applies_every_preset() -> Result<()> {
    let mut config = WardrobeConfig::load(&demo_wardrobe())?;
    config.batch_delay = std::time::Duration::ZERO;
    let mut session = Session::open_with(&demo_wardrobe(), config).await?;
    assert!(session.report.failed.is_empty(), "{:?}", session.report.failed);
    assert_eq!(session.report.loaded.len(), 17);

    let names: Vec<String> = session
        .config
        .presets
        .names()
        .map(str::to_string)
        .collect();
    assert_eq!(
        names,
        vec!["birthday", "default", "halloween", "sea_creature", "sun_moon"]
    );
    for name in &names {
        session.apply_preset(name)?;
        assert_invariants(&session.dresser);
    }

    let report = session.apply_preset("sea_creature")?;
    assert!(report.shown.contains(&id("bag1_4")));
    assert!(!report.shown.contains(&id("bag1_3")));
    assert!(report.skipped.iter().any(|skip| skip.item == id("hat2_3b")));
    Ok(())
}
