//! # groupdraw CLI Library
//!
//! Command-line front end for the group-stage draw engine. It runs draws,
//! steps through them interactively, builds seeding pools from ranking data and
//! verifies recorded draws.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line
//! arguments and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["groupdraw", "draw", "--seed", "42"];
//! let code = groupdraw_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `draw`: Run a complete draw, optionally appending it to a JSONL log
//! - `step`: Step through a draw from the keyboard
//! - `pools`: Build the four seeding pools from ranking data
//! - `verify`: Check recorded draws against the draw rules
//! - `sim`: Count dead ends per lookahead mode over many draws
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;
pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
pub mod ui;

use cli::{Commands, GroupdrawCli};
use commands::{
    DrawOptions, handle_cfg_command, handle_draw_command, handle_pools_command,
    handle_sim_command, handle_step_command, handle_verify_command,
};

pub use error::{BatchValidationError, CliError};

const COMMANDS: &[&str] = &["draw", "step", "pools", "verify", "sim", "cfg"];

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate subcommand handler.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors
///
/// # Example
///
/// ```
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let code = groupdraw_cli::run(["groupdraw", "pools", "--seed", "1"], &mut out, &mut err);
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().contains("Pool 1: USA*, MEX*, CAN*"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match GroupdrawCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Draw {
            seed,
            lookahead,
            pools,
            output,
            format,
            max_attempts,
            events,
        } => handle_draw_command(
            DrawOptions {
                seed,
                lookahead,
                pools,
                output,
                format,
                max_attempts,
                events,
            },
            out,
            err,
        ),
        Commands::Step {
            seed,
            lookahead,
            pools,
        } => {
            // Use stdin for real input (supports both TTY and piped stdin)
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_step_command(seed, lookahead, pools, out, err, &mut stdin_lock)
        }
        Commands::Pools {
            seed,
            ranking,
            format,
        } => handle_pools_command(seed, ranking, format, out),
        Commands::Verify { input } => {
            let Some(path) = input else {
                let _ = ui::write_error(err, "input required");
                return exit_code::ERROR;
            };
            handle_verify_command(path, out, err)
        }
        Commands::Sim {
            draws,
            seed,
            pools,
            lookahead,
        } => handle_sim_command(draws, seed, pools, lookahead, out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn report_parse_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }

    let mut usage = || -> std::io::Result<()> {
        writeln!(err, "{}", e)?;
        writeln!(err)?;
        writeln!(err, "Group draw CLI")?;
        writeln!(err, "Usage: groupdraw <command> [options]\n")?;
        writeln!(err, "Commands:")?;
        for c in COMMANDS {
            writeln!(err, "  {}", c)?;
        }
        writeln!(err, "\nFor full help, run: groupdraw --help")
    };
    let _ = usage();
    exit_code::ERROR
}
