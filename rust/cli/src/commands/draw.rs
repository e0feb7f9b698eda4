//! Draw command handler.
//!
//! Runs one full draw. When a session stops on a team with no valid group,
//! a fresh session is started on the next seed, up to `max_attempts` sessions.
//! Each attempt rebuilds the pool table from its own seed, so the seed saved
//! with the record replays the draw on its own. Every failed attempt is
//! reported on stderr with the stranded team.

use super::{load_config, load_pool_table, today_draw_id};
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::formatters::format_draw;
use crate::io_utils::ensure_parent_dir;
use crate::ui;
use groupdraw_engine::assignment::PoolAssignmentEngine;
use groupdraw_engine::errors::DrawError;
use groupdraw_engine::lookahead::LookaheadMode;
use groupdraw_engine::record::{DrawLogger, DrawRecord};
use groupdraw_engine::session::DrawSession;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Flags of the `draw` command. `None` falls back to the configuration.
#[derive(Debug, Clone)]
pub struct DrawOptions {
    pub seed: Option<u64>,
    pub lookahead: Option<LookaheadMode>,
    pub pools: Option<String>,
    pub output: Option<String>,
    pub format: OutputFormat,
    pub max_attempts: Option<u32>,
    pub events: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            seed: None,
            lookahead: None,
            pools: None,
            output: None,
            format: OutputFormat::Table,
            max_attempts: None,
            events: false,
        }
    }
}

/// Handle the draw command.
///
/// # Example
///
/// ```no_run
/// # use std::io;
/// # use groupdraw_cli::commands::{handle_draw_command, DrawOptions};
/// let opts = DrawOptions { seed: Some(42), ..DrawOptions::default() };
/// handle_draw_command(opts, &mut io::stdout(), &mut io::stderr()).unwrap();
/// ```
pub fn handle_draw_command(
    opts: DrawOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = load_config()?;
    let base_seed = opts.seed.or(cfg.seed).unwrap_or_else(rand::random);
    let mode = opts.lookahead.unwrap_or(cfg.lookahead);
    let max_attempts = opts.max_attempts.unwrap_or(cfg.max_attempts);
    if max_attempts == 0 {
        return Err(CliError::InvalidInput(
            "max-attempts must be >= 1".to_string(),
        ));
    }
    let pools = opts.pools.clone().or(cfg.pools);
    let engine = PoolAssignmentEngine::with_mode(mode);

    for attempt in 1..=max_attempts {
        let seed = base_seed.wrapping_add(u64::from(attempt - 1));
        let table = load_pool_table(pools.as_deref(), seed)?;
        let mut session = DrawSession::new_with_seed(table, engine, seed);
        match session.run_to_completion() {
            Ok(()) => return finish(&opts, seed, attempt, &session, out),
            Err(DrawError::NoValidGroup { team }) => {
                warn!(attempt, seed, team = %team, "draw attempt failed");
                ui::display_warning(
                    err,
                    &format!(
                        "attempt {} (seed {}) stopped in pool {}: no valid group for {}",
                        attempt,
                        seed,
                        session.completed_pool() + 1,
                        team
                    ),
                )?;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(CliError::Engine(format!(
        "no complete draw after {} attempt(s)",
        max_attempts
    )))
}

fn finish(
    opts: &DrawOptions,
    seed: u64,
    attempts: u32,
    session: &DrawSession,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut logger = match &opts.output {
        Some(path) => {
            ensure_parent_dir(Path::new(path)).map_err(CliError::InvalidInput)?;
            Some(DrawLogger::create(path)?)
        }
        None => None,
    };
    let draw_id = match logger.as_mut() {
        Some(l) => l.next_id(),
        None => today_draw_id(),
    };

    let mut record = DrawRecord::from_session(draw_id, Some(seed), attempts, session);
    if opts.events {
        record.meta = Some(serde_json::json!({ "events": session.events() }));
    }
    if let Some(l) = logger.as_mut() {
        l.write(&record)?;
    }

    match opts.format {
        OutputFormat::Table => {
            if opts.events {
                for event in session.events() {
                    writeln!(out, "{}", event)?;
                }
                writeln!(out)?;
            }
            writeln!(out, "{}", format_draw(&record))?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&record).map_err(std::io::Error::other)?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}
