//! PinField - tactile pin-display simulator
//!
//! Renders procedural patterns, semantic pages, Braille text or images onto
//! a simulated grid of actuated pins, either in a terminal preview or
//! headless with a printed relief.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pinfield::config::{Config, ConfigUpdate, DisplayMode, PatternKind, PhysicsMode};
use pinfield::constants::{APP_BINARY_NAME, APP_NAME};
use pinfield::engine::{InstanceBuffer, PinFieldEngine};
use pinfield::parser::parse_page_file;
use pinfield::services::fetch::DefaultFetcher;

/// Simulated headless frame time (60 Hz).
const HEADLESS_DT: f32 = 1.0 / 60.0;

/// PinField - tactile pin-display simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Semantic page (JSON) to show through the compositor
    #[arg(long, value_name = "FILE")]
    page: Option<PathBuf>,

    /// Image URL or path to show
    #[arg(long, value_name = "URL")]
    image: Option<String>,

    /// Text to show as Braille
    #[arg(long, value_name = "TEXT")]
    text: Option<String>,

    /// Pins per side
    #[arg(long, value_name = "N")]
    grid_size: Option<usize>,

    /// Procedural pattern (wave, ripple, gaussian, noise, flat)
    #[arg(long, value_parser = parse_pattern)]
    pattern: Option<PatternKind>,

    /// Snap pins to their targets instead of easing
    #[arg(long)]
    ideal: bool,

    /// Config file to use instead of the platform default
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Run without a terminal UI for this many ticks and print the relief
    #[arg(long, value_name = "TICKS")]
    headless: Option<usize>,
}

fn parse_pattern(s: &str) -> Result<PatternKind, String> {
    PatternKind::ALL
        .into_iter()
        .find(|p| format!("{p:?}").eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown pattern '{s}' (expected wave, ripple, gaussian, noise or flat)"))
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = if cli.verbose { "debug" } else { "info" };
    let interactive = cli.headless.is_none() && cfg!(feature = "ratatui");

    // The preview owns the screen: without a log file it stays silent
    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };
    let stderr_layer = (file_layer.is_none() && !interactive)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default(),
    };
    config
        .apply(ConfigUpdate {
            grid_size: cli.grid_size,
            pattern: cli.pattern,
            physics_mode: cli.ideal.then_some(PhysicsMode::Ideal),
            display_mode: cli.page.is_some().then_some(DisplayMode::Web),
            ..ConfigUpdate::default()
        })
        .context("Invalid command-line options")?;

    let mut engine = PinFieldEngine::new(config)?;

    if let Some(path) = &cli.page {
        let page = parse_page_file(path).with_context(|| {
            format!("Run `{APP_BINARY_NAME} --help` for the expected page options")
        })?;
        engine.set_page(page);
    }
    if let Some(text) = &cli.text {
        engine.enter_reading(text.clone());
    }
    if let Some(url) = &cli.image {
        engine.load_image(&DefaultFetcher::new(), url).await;
    }

    match cli.headless {
        Some(ticks) => {
            run_headless(&mut engine, ticks);
            Ok(())
        }
        None => run_preview(engine).await,
    }
}

fn run_headless(engine: &mut PinFieldEngine, ticks: usize) {
    let mut buffer = InstanceBuffer::new();
    for _ in 0..ticks.max(1) {
        engine.tick(HEADLESS_DT, &mut buffer);
    }

    let config = engine.config();
    print!(
        "{}",
        engine
            .current_heights()
            .to_relief_string(config.min_height, config.max_height)
    );
    println!(
        "{} v{} | mode {} | {} pins | last tick pushed {} | {} uploads total",
        APP_NAME,
        env!("CARGO_PKG_VERSION"),
        engine.mode().label(),
        buffer.len(),
        engine.last_dirty_count(),
        buffer.total_transform_uploads()
    );
    info!("Headless run finished after {} ticks", ticks.max(1));
}

#[cfg(feature = "ratatui")]
async fn run_preview(engine: PinFieldEngine) -> Result<()> {
    use pinfield::tui;

    let mut terminal = tui::setup_terminal()?;
    let mut state = tui::PreviewState::new(engine);
    let result = tui::run_tui(&mut state, &mut terminal).await;
    tui::restore_terminal(terminal)?;
    result
}

#[cfg(not(feature = "ratatui"))]
async fn run_preview(mut engine: PinFieldEngine) -> Result<()> {
    info!("Built without the terminal preview; running headless");
    run_headless(&mut engine, 60);
    Ok(())
}
