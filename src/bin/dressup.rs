//! Command-line front end for the wardrobe.
//!
//! `dressup show` loads the wardrobe, applies an optional preset followed by
//! any toggles, and prints the outfit (or the full stage as JSON).
//! `dressup presets` lists the presets declared in `wardrobe.json`, and
//! `dressup validate` loads every category strictly so broken files fail the
//! run instead of silently rendering empty.

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use dressup::{
    CategoryName, ItemId, Session, ToggleOutcome, WardrobeConfig, dir_loader, find_wardrobe_root,
    split_list,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Dress-up wardrobe: load item catalogs and compose an outfit.
#[derive(Parser, Debug)]
#[command(name = "dressup", version, about, long_about = None)]
struct Cli {
    /// Wardrobe directory (defaults to DRESSUP_ROOT or the nearest wardrobe.json)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Log loader progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose an outfit and print it
    Show {
        /// Preset to apply before any toggles
        #[arg(long, value_name = "NAME")]
        preset: Option<String>,

        /// Toggle ITEM within CATEGORY; repeatable, comma-separated lists allowed
        #[arg(long = "toggle", value_name = "ITEM@CATEGORY")]
        toggles: Vec<String>,

        /// Print the full stage as JSON
        #[arg(long)]
        json: bool,
    },
    /// List presets declared in the manifest
    Presets {
        /// Print presets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load every category strictly and report failures
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let root = match cli.root {
        Some(root) => root,
        None => find_wardrobe_root()?,
    };
    if !root.is_dir() {
        bail!("Wardrobe directory not found: {}", root.display());
    }
    let config = WardrobeConfig::load(&root)?.with_env_overrides()?;

    match cli.command {
        Command::Show {
            preset,
            toggles,
            json,
        } => show(root, config, preset.as_deref(), &toggles, json).await,
        Command::Presets { json } => {
            print_presets(&config, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate => validate(root, config).await,
    }
}

async fn show(
    root: PathBuf,
    config: WardrobeConfig,
    preset: Option<&str>,
    toggles: &[String],
    json: bool,
) -> Result<ExitCode> {
    let toggles = parse_toggles(toggles)?;
    let mut session = Session::open_with(&root, config).await?;

    if let Some(name) = preset {
        session.apply_preset(name)?;
    }
    for (item, category) in &toggles {
        let outcome = session.dresser.toggle(item, category);
        if matches!(outcome, ToggleOutcome::Refused | ToggleOutcome::Missing) {
            warn!(item = %item, category = %category, ?outcome, "toggle had no effect");
        }
    }

    let stage = session.stage();
    if json {
        println!("{}", serde_json::to_string_pretty(&stage)?);
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(name) = session.dresser.active_preset() {
        println!("preset: {name}");
    }
    for layer in stage.visible_layers() {
        println!("{}\t{}\t{}", layer.category, layer.id, layer.alt);
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_toggles(raw: &[String]) -> Result<Vec<(ItemId, CategoryName)>> {
    raw.iter()
        .flat_map(|value| split_list(value))
        .map(|token| {
            let (item, category) = token
                .split_once('@')
                .ok_or_else(|| anyhow!("Toggle '{token}' must look like ITEM@CATEGORY"))?;
            if item.is_empty() || category.is_empty() {
                bail!("Toggle '{token}' must look like ITEM@CATEGORY");
            }
            Ok((ItemId::normalized(item), CategoryName::new(category)))
        })
        .collect()
}

fn print_presets(config: &WardrobeConfig, json: bool) -> Result<()> {
    if json {
        let presets: Vec<_> = config.presets.iter().collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&presets).context("serializing presets")?
        );
        return Ok(());
    }
    for preset in config.presets.iter() {
        let picks = preset
            .selections
            .iter()
            .map(|selection| format!("{}@{}", selection.item, selection.category))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}\t{}", preset.name, picks);
    }
    Ok(())
}

async fn validate(root: PathBuf, config: WardrobeConfig) -> Result<ExitCode> {
    let loader = dir_loader(&root, &config)?;
    let mut failures = 0usize;
    for file in &config.category_files {
        match loader.load_category_strict(file).await {
            Ok(items) => println!("ok\t{file}\t{} item(s)", items.len()),
            Err(err) => {
                failures += 1;
                println!("error\t{file}\t{err:#}");
            }
        }
    }

    if failures == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "{failures} of {} category file(s) failed validation",
            config.category_files.len()
        );
        Ok(ExitCode::FAILURE)
    }
}
