//! Step command handler.
//!
//! Drives a draw from line-based input through a [`PlaybackController`]:
//! an empty line or `s` places one team, `a` plays to the end, `p` pauses or
//! resumes, `r` starts over and `q` quits. Every engine event is echoed as it
//! happens.

use super::{load_config, load_pool_table, today_draw_id};
use crate::error::CliError;
use crate::formatters::format_draw;
use crate::io_utils::read_stdin_line;
use crate::ui;
use groupdraw_engine::assignment::PoolAssignmentEngine;
use groupdraw_engine::controller::{PlaybackCommand, PlaybackController, PlaybackState};
use groupdraw_engine::lookahead::LookaheadMode;
use groupdraw_engine::record::DrawRecord;
use groupdraw_engine::session::DrawSession;
use std::io::{BufRead, Write};

pub fn handle_step_command(
    seed: Option<u64>,
    lookahead: Option<LookaheadMode>,
    pools: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let cfg = load_config()?;
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let mode = lookahead.unwrap_or(cfg.lookahead);
    let pools = pools.or(cfg.pools);
    let table = load_pool_table(pools.as_deref(), seed)?;
    let mut session =
        DrawSession::new_with_seed(table, PoolAssignmentEngine::with_mode(mode), seed);
    let mut controller = PlaybackController::new();

    writeln!(out, "Draw (seed {}, {} lookahead)", seed, mode)?;
    writeln!(
        out,
        "Enter/s: step  a: play to end  p: pause/resume  r: reset  q: quit"
    )?;

    while controller.state() != PlaybackState::Finished {
        if !controller.should_advance() {
            write!(out, "> ")?;
            out.flush()?;
            let Some(line) = read_stdin_line(stdin) else {
                writeln!(out)?;
                writeln!(out, "Input closed after {} placements", session.assignments().len())?;
                return Ok(());
            };
            if matches!(line.as_str(), "q" | "quit") {
                writeln!(out, "Stopped after {} placements", session.assignments().len())?;
                return Ok(());
            }
            match line.parse::<PlaybackCommand>() {
                Ok(PlaybackCommand::Reset) => {
                    session.reset();
                    controller.apply(PlaybackCommand::Reset);
                    writeln!(out, "Draw reset")?;
                }
                Ok(cmd) => {
                    controller.apply(cmd);
                }
                Err(e) => ui::display_warning(err, &e)?,
            }
            continue;
        }

        let result = controller.tick(&mut session);
        for event in session.drain_events() {
            writeln!(out, "{}", event)?;
        }
        result?;
    }

    let record = DrawRecord::from_session(today_draw_id(), Some(seed), 1, &session);
    writeln!(out)?;
    writeln!(out, "{}", format_draw(&record))?;
    Ok(())
}
