//! Count Battle - command-line front end
//!
//! Scores catalog boards under the same transforms the quiz uses, lists whole
//! catalogs, and replays scripted sessions against the client state machine.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod replay;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CatalogArgs, Cli, Command};
use config::{AppConfig, CatalogPaths};
use countbattle_core::{BoardCatalog, ScoreEngine, ScoringMode, Symmetry};
use countbattle_session::{GameSettings, MemorySettingsStore, SessionContext, SettingsStore, TomlSettingsStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::discover(cli.config.as_deref())?;

    match cli.command {
        Command::Score {
            catalog,
            index,
            flip_x,
            flip_y,
            transpose,
            invert,
            random,
            mode,
        } => {
            let symmetry = if random {
                Symmetry::random(&mut rand::rng())
            } else {
                Symmetry::new(flip_x, flip_y, transpose, invert)
            };
            run_score(&config, &catalog, index, symmetry, mode)
        }
        Command::Catalog { catalog } => run_catalog(&config, &catalog),
        Command::Replay { script, seed } => run_replay(&config, &script, seed),
    }
}

/// Picks the catalog named on the command line, else the configured one.
#[instrument(skip(config))]
fn load_catalog(config: &AppConfig, args: &CatalogArgs) -> Result<BoardCatalog> {
    let paths = match (&args.boards, &args.dead) {
        (Some(boards), Some(dead)) => CatalogPaths::new(boards, dead),
        _ if args.hard => config
            .hard()
            .clone()
            .context("No hard catalog configured")?,
        _ => config.normal().clone(),
    };
    Ok(paths.load()?)
}

/// Score one board.
#[instrument(skip(config))]
fn run_score(
    config: &AppConfig,
    args: &CatalogArgs,
    index: usize,
    symmetry: Symmetry,
    mode: Option<ScoringMode>,
) -> Result<()> {
    let catalog = load_catalog(config, args)?;
    let source = catalog
        .get(index)
        .with_context(|| format!("Board {} not found; catalog has {} boards", index, catalog.len()))?;

    let position = source.transform(&symmetry);
    let mode = mode.unwrap_or(*config.scoring_mode());
    let report = ScoreEngine::new().score(&position, mode);
    println!("{}", report::render_score(index, symmetry, &position, &report));
    Ok(())
}

/// List a whole catalog.
#[instrument(skip(config))]
fn run_catalog(config: &AppConfig, args: &CatalogArgs) -> Result<()> {
    let catalog = load_catalog(config, args)?;
    println!(
        "{}",
        report::render_catalog(&catalog, &ScoreEngine::new(), *config.scoring_mode())
    );
    Ok(())
}

/// Replay a session script.
#[instrument(skip(config))]
fn run_replay(config: &AppConfig, script: &std::path::Path, seed: Option<u64>) -> Result<()> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let steps = replay::parse_script(&text)?;

    // Settings on disk seed the session; scripted changes stay in memory.
    let mut store = MemorySettingsStore::new();
    let mut settings = GameSettings::load(&TomlSettingsStore::open(config.settings_file()));
    if !config.settings_file().exists() {
        settings.scoring_mode = *config.scoring_mode();
    }
    settings.save(&mut store);

    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let store: Box<dyn SettingsStore> = Box::new(store);
    let (mut session, _events) = SessionContext::create(config.load_library()?, store, rng);

    info!(steps = steps.len(), "Replaying script");
    for line in replay::replay(&mut session, steps) {
        println!("{}", line);
    }
    session.leave_room();
    Ok(())
}
