//! # Last Turn CLI Library
//!
//! Command-line front end for the Last Turn card battle. It exposes
//! subcommands for playing a match, simulating many, and analyzing the
//! records they produce.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line
//! arguments and executes the appropriate subcommand. [`run_with_input`] does
//! the same with an explicit input stream for `play`.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["lastturn", "sim", "--matches", "10", "--seed", "7"];
//! let code = lastturn_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play one match over stdin with real clocks
//! - `sim`: Run headless AI-vs-AI matches, optionally recording them as JSONL
//! - `stats`: Aggregate statistics from JSONL match records
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::{BufRead, Write};

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
pub mod ui;

use cli::{Commands, LastTurnCli, MatchArgs};
use commands::{handle_cfg_command, handle_play_command, handle_sim_command, handle_stats_command};
use commands::sim::SimArgs;
use lastturn_ai::AI_NAMES;

pub use error::CliError;

/// Main entry point for the CLI application. `play` reads from stdin.
///
/// Returns the process exit code: `0` for success, `2` for errors, `130`
/// when an interactive match is abandoned.
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["lastturn", "sim", "--matches", "2", "--seed", "42"];
/// let mut out = Vec::new();
/// let code = lastturn_cli::run(args, &mut out, &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = Box::new(std::io::BufReader::new(std::io::stdin()));
    run_with_input(args, stdin, out, err)
}

/// [`run`] with the interactive input stream supplied by the caller.
pub fn run_with_input<I, S>(
    args: I,
    input: Box<dyn BufRead + Send>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match LastTurnCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Play { opts } => resolve_config(&opts, err)
            .and_then(|config| handle_play_command(&config, input, out, err)),
        Commands::Sim {
            matches,
            output,
            opts,
        } => resolve_config(&opts, err).and_then(|config| {
            handle_sim_command(&SimArgs { matches, output }, &config, out, err)
        }),
        Commands::Stats { input, outcome } => handle_stats_command(&input, outcome, out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(_)) => exit_code::INTERRUPTED,
        Err(e) => {
            if writeln!(err, "Error: {}", e).is_err() {
                return exit_code::ERROR;
            }
            e.exit_code()
        }
    }
}

/// Layered configuration with command-line flags applied last.
fn resolve_config(opts: &MatchArgs, err: &mut dyn Write) -> Result<config::Config, CliError> {
    let mut resolved = config::load_with_sources()?.config;
    opts.apply(&mut resolved);
    config::validate(&resolved)?;
    if !is_known_ai(&resolved.ai) {
        ui::display_warning(
            err,
            &format!(
                "Unknown AI '{}', using baseline (known: {})",
                resolved.ai,
                AI_NAMES.join(", ")
            ),
        )?;
    }
    Ok(resolved)
}

fn is_known_ai(name: &str) -> bool {
    AI_NAMES.contains(&name) || name == "first-fit"
}

fn report_parse_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(out, "{}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::SUCCESS
        }
        _ => {
            if writeln!(err, "{}", e).is_err()
                || writeln!(err).is_err()
                || writeln!(err, "Last Turn CLI").is_err()
                || writeln!(err, "Usage: lastturn <command> [options]\n").is_err()
                || writeln!(err, "Commands:").is_err()
            {
                return exit_code::ERROR;
            }
            for c in Commands::NAMES {
                if writeln!(err, "  {}", c).is_err() {
                    return exit_code::ERROR;
                }
            }
            if writeln!(err, "\nFor full help, run: lastturn --help").is_err() {
                return exit_code::ERROR;
            }
            exit_code::ERROR
        }
    }
}
