//! # Eggbot
//!
//! Runs one drawing session: home the machine, wait out the settle delay,
//! draw a named design or a pattern file, and beep when done.
//!
//! The hardware backend is chosen by driver name from the HAL driver
//! registry; `simulation` runs the whole session against simulated axes and
//! a simulated clock.

use clap::Parser;
use eggbot_common::config::{ConfigError, EggbotConfig};
use eggbot_common::consts::{DEFAULT_CONFIG_PATH, DEFAULT_DRIVER};
use eggbot_common::control_unit::pattern::Pattern;
use eggbot_control_unit::config::{load_config, load_pattern};
use eggbot_control_unit::error::ControlError;
use eggbot_control_unit::sequencer::designs::Design;
use eggbot_control_unit::session::Session;
use eggbot_hal::DriverRegistry;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Eggbot - pattern drawing engine
#[derive(Parser, Debug)]
#[command(name = "eggbot")]
#[command(version)]
#[command(about = "Draws geometric patterns on an egg with a three-axis pen plotter")]
struct Args {
    /// Path to the machine configuration TOML.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Built-in design to draw (see --list).
    #[arg(long, conflicts_with = "pattern")]
    design: Option<String>,

    /// Pattern file to draw instead of a built-in design.
    #[arg(long, value_name = "FILE")]
    pattern: Option<PathBuf>,

    /// HAL driver name.
    #[arg(long, default_value = DEFAULT_DRIVER)]
    driver: String,

    /// Skip manual confirmation checkpoints.
    #[arg(long)]
    no_confirm: bool,

    /// List built-in designs and drivers, then exit.
    #[arg(long)]
    list: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    if args.list {
        print_listing();
        return;
    }

    let (mut config, fell_back) = match read_config(&args.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("FATAL: {}: {e}", args.config.display());
            process::exit(1);
        }
    };
    setup_tracing(&args, config.shared.log_level.as_directive());

    info!("Eggbot v{} starting...", env!("CARGO_PKG_VERSION"));
    if fell_back {
        warn!(
            path = %args.config.display(),
            "Configuration file not found, using built-in defaults"
        );
    }
    if args.no_confirm {
        config.session.confirm_checkpoints = false;
    }

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Eggbot shutdown complete");
}

/// Load the configuration; a missing file at the default path means defaults.
fn read_config(path: &Path) -> Result<(EggbotConfig, bool), ControlError> {
    match load_config(path) {
        Ok(config) => Ok((config, false)),
        Err(ControlError::Config(ConfigError::FileNotFound))
            if path == Path::new(DEFAULT_CONFIG_PATH) =>
        {
            Ok((EggbotConfig::default(), true))
        }
        Err(e) => Err(e),
    }
}

fn run(args: &Args, config: &EggbotConfig) -> Result<(), ControlError> {
    let pattern = select_pattern(args)?;

    let registry = DriverRegistry::with_builtin_drivers();
    let mut driver = registry.create_driver(&args.driver)?;
    info!(
        driver = driver.name(),
        version = driver.version(),
        "HAL driver selected"
    );
    let mut machine = driver.init(config)?;

    let mut session = Session::new(config);
    let report = session.run(&mut machine, &pattern)?;
    info!(
        pattern = %report.pattern,
        steps = report.sequence.steps,
        checkpoints = report.sequence.checkpoints,
        skipped = report.sequence.skipped_checkpoints,
        homing_passes = report.sequence.home_passes,
        contacts = report.contacts,
        elapsed = ?report.elapsed,
        "Drawing finished"
    );
    Ok(())
}

fn select_pattern(args: &Args) -> Result<Pattern, ControlError> {
    if let Some(path) = &args.pattern {
        return load_pattern(path);
    }
    let design: Design = args
        .design
        .as_deref()
        .unwrap_or(Design::WaveBetweenLines.name())
        .parse()?;
    info!(design = %design, "Design selected");
    Ok(design.pattern())
}

fn print_listing() {
    println!("Designs:");
    for design in Design::ALL {
        println!("  {:<20} {}", design.name(), design.summary());
    }
    println!("Drivers:");
    for name in DriverRegistry::with_builtin_drivers().list_drivers() {
        println!("  {name}");
    }
}

fn setup_tracing(args: &Args, default_level: &str) {
    let level = if args.verbose { "debug" } else { default_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
