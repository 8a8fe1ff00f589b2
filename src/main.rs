//! handopt
//!
//! Interactive hand-optimization of a black-box quantum circuit.
//!
//! # Usage
//!
//! ```bash
//! # The one-parameter warm-up
//! handopt
//!
//! # The three-rotation circuit with a decoy input, drawing to a custom file
//! handopt --preset black-box --output runs/trajectory.svg
//!
//! # Settings from a file, random hidden target
//! handopt --config session.toml --seed 7
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use handopt::config::Overrides;
use handopt::{Colormap, ConsoleInput, HandoptError, Preset, SessionConfig, TerminationReason};

/// Guess the parameters of a hidden circuit and watch your trajectory on the Bloch sphere
#[derive(Parser, Debug)]
#[command(name = "handopt")]
#[command(author, version, about)]
struct Cli {
    /// Path to a TOML session configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in exercise to play
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Iteration budget
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Colormap used to paint trials by loss
    #[arg(long, value_enum)]
    colormap: Option<Colormap>,

    /// Paint low loss red instead of blue
    #[arg(long)]
    invert_colors: bool,

    /// Hide a random target state instead of the preset's
    #[arg(long)]
    random_target: bool,

    /// Seed for the random target (implies --random-target)
    #[arg(long)]
    seed: Option<u64>,

    /// SVG file the trajectory is drawn to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not draw the trajectory
    #[arg(long)]
    no_render: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    show_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    match run(cli) {
        Ok(Some(reason)) => ExitCode::from(reason.exit_status()),
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "session failed");
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_status())
        }
    }
}

/// Returns `None` when no session was started (`--show-config`).
fn run(cli: Cli) -> Result<Option<TerminationReason>, HandoptError> {
    let mut config = SessionConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&Overrides {
        preset: cli.preset,
        iterations: cli.iterations,
        colormap: cli.colormap,
        invert_colors: cli.invert_colors,
        random_target: cli.random_target,
        seed: cli.seed,
        output: cli.output,
        no_render: cli.no_render,
    });

    if cli.show_config {
        print!("{}", config.to_toml()?);
        return Ok(None);
    }

    // Interrupts end the process with status 0; a blocking stdin read can't be woken
    if let Err(e) = ctrlc::set_handler(|| std::process::exit(0)) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    let mut session = config
        .session_builder()?
        .input(Box::new(ConsoleInput::stdio()))
        .output(Box::new(std::io::stdout()))
        .build()?;

    info!(preset = ?config.preset, budget = session.budget(), "session starting");
    let reason = session.run()?;
    info!(?reason, trials = session.cache().len(), "session ended");
    Ok(Some(reason))
}

/// Initialize logging with tracing. Logs go to stderr so they never mix with prompts.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
