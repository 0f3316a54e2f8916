//! wrapwine-scan - menu generator and launcher front-end for wrapwine units
//!
//! # Overview
//!
//! Every file in the units directory (`~/.wrapwines` by default) describes one
//! Wine application as shell-style `KEY=VALUE` assignments. This binary:
//! - scans that directory into a [`UnitCatalog`]
//! - prints menus for rofigen (`menu`) or rofi script mode (`titles`)
//! - maps a selected title back to its unit and starts the configured
//!   command template (`launch`)
//! - explains a single unit's verdict and launch plan (`show`)
//!
//! # Configuration
//!
//! `settings.yaml` in the platform config directory (or `--config-dir`),
//! with `WRAPWINE_*` environment overrides. See [`Settings`].

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use wrapwine_scan::services::spawn_detached;
use wrapwine_scan::{
    APP_NAME, ConfigManager, EnvSnapshot, LaunchPlan, Settings, Unit, UnitCatalog, VERSION,
};

#[derive(Parser)]
#[command(name = "wrapwine-scan", version)]
#[command(about = "Scan wrapwine units and build launcher menus", long_about = None)]
struct Cli {
    /// Directory holding settings.yaml
    #[arg(long, env = "WRAPWINE_CONFIG_DIR")]
    config_dir: Option<Utf8PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a rofigen menu (title + menu entries)
    Menu {
        /// Units directory (defaults to the configured units_dir)
        dir: Option<Utf8PathBuf>,
    },
    /// Print one usable title per line, for rofi script mode
    Titles,
    /// Launch the unit matching a selected title
    Launch {
        /// Selected title, possibly split into words by the caller
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        title: Vec<String>,
    },
    /// Show a single unit's verdict and launch plan
    Show {
        /// Path to the unit file
        file: Utf8PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => ConfigManager::default_dir()?,
    };
    let config_manager = ConfigManager::new(&config_dir)?;
    let settings = config_manager.load_settings()?;

    let log_dir = settings.log_dir.as_deref().map(Utf8PathBuf::from);
    let _guard = wrapwine_scan::logging::setup_logging(
        cli.debug || settings.debug,
        log_dir.as_deref(),
        APP_NAME,
    )?;

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    let snapshot = EnvSnapshot::capture();

    match cli.command {
        Commands::Menu { dir } => {
            let dir = dir.unwrap_or_else(|| settings.units_dir_path(&snapshot));
            tracing::debug!("args: {}", dir);
            let catalog = UnitCatalog::scan(&dir, &snapshot)?;
            print!("{}", catalog.render_rofigen(&settings));
        }
        Commands::Titles => {
            let catalog = UnitCatalog::scan(&settings.units_dir_path(&snapshot), &snapshot)?;
            println!("{}", catalog.render_titles(&settings));
        }
        Commands::Launch { title } => launch(&settings, &snapshot, &title.join(" "))?,
        Commands::Show { file } => show(&file, &snapshot)?,
    }

    Ok(())
}

fn launch(settings: &Settings, snapshot: &EnvSnapshot, selection: &str) -> Result<()> {
    let catalog = UnitCatalog::scan(&settings.units_dir_path(snapshot), snapshot)?;

    let Some(unit) = catalog.find(selection) else {
        bail!("Could not find a title matching '{}'", selection);
    };
    if !unit.is_usable() {
        bail!(
            "'{}' is skipped: {}",
            unit.basic_title(),
            unit.error_messages().join(", ")
        );
    }
    tracing::debug!("Launching program title '{}'", unit.basic_title());

    let command = settings.render_command(unit.source_path());
    tracing::debug!("command: {}", command);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    runtime.block_on(async { spawn_detached(&command) })?;

    Ok(())
}

fn show(file: &Utf8Path, snapshot: &EnvSnapshot) -> Result<()> {
    let unit = Unit::load(file, snapshot)?;

    println!("title:   {}", unit.display_title());
    println!("id:      {}", unit.basic_title());
    println!("state:   {:?}", unit.state());
    for error in unit.error_messages() {
        println!("error:   {}", error);
    }
    for key in &unit.expansion().legacy_references {
        println!("advice:  {} uses a bare $VAR reference, prefer ${{VAR}}", key);
    }

    if !unit.is_usable() {
        return Ok(());
    }

    let plan = LaunchPlan::build(&unit, snapshot)?;
    println!("cwd:     {}", plan.working_dir);
    println!("command: {}", plan.command.join(" "));
    for (key, value) in &plan.env {
        if snapshot.get(key) != Some(value.as_str()) {
            println!("env:     {}={}", key, value);
        }
    }

    Ok(())
}
