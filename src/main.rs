//! Ring Registry
//!
//! Command-line processor for station ring scripts: builds the initial
//! ring, applies the build/close neighbor commands in order, and prints
//! one report line per command that yields one.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Script Runner                       │
//! │    header / initial stations / one command per line     │
//! ├─────────────────────────────────────────────────────────┤
//! │                     Ring Registry                       │
//! │  ┌───────────────────────┐     ┌─────────────────────┐  │
//! │  │     Slab<Station>     │     │ HashMap<StationId,  │  │
//! │  │  slot-linked next and │◄───►│ slot>               │  │
//! │  │  prev arena nodes     │     │ O(1) station lookup │  │
//! │  └───────────────────────┘     └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ring_registry::{run_script, ScriptSummary};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Ring Registry - circular station ring command processor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script file to execute; reads stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Write report lines to this file instead of stdout
    #[arg(long, env = "RING_OUTPUT")]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args);

    info!("Starting Ring Registry");
    info!("  Version: {}", ring_registry::VERSION);
    info!("  Input: {}", input_label(&args));

    let summary = execute(&args)?;

    info!("Script complete");
    info!("  Initial stations: {}", summary.initial_stations);
    info!("  Commands applied: {}", summary.commands_applied);
    info!("  Reports emitted: {}", summary.reports_emitted);
    info!("  Closes refused: {}", summary.closes_refused);
    info!("  Final stations: {}", summary.final_stations);

    Ok(())
}

fn input_label(args: &Args) -> String {
    match &args.input {
        Some(path) if path.as_os_str() != "-" => path.display().to_string(),
        _ => "stdin".to_string(),
    }
}

// =============================================================================
// Script Execution
// =============================================================================

fn execute(args: &Args) -> anyhow::Result<ScriptSummary> {
    match &args.input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            run_to_output(BufReader::new(file), args)
        }
        _ => {
            let stdin = io::stdin();
            run_to_output(stdin.lock(), args)
        }
    }
}

fn run_to_output<R: BufRead>(reader: R, args: &Args) -> anyhow::Result<ScriptSummary> {
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output {}", path.display()))?;
            Ok(run_script(reader, BufWriter::new(file))?)
        }
        None => {
            let stdout = io::stdout();
            Ok(run_script(reader, BufWriter::new(stdout.lock()))?)
        }
    }
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Report lines own stdout, so logs go to stderr
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .init();
    }
}
