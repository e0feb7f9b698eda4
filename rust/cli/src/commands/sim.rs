//! Sim command handler.
//!
//! Runs many independent draws on one pool table and counts how often each
//! lookahead mode runs into a team with no valid group. Draw `i` uses seed
//! `base + i` for every mode, so the modes face the same sequence of seeds.

use super::{load_config, load_pool_table};
use crate::error::CliError;
use groupdraw_engine::assignment::PoolAssignmentEngine;
use groupdraw_engine::errors::DrawError;
use groupdraw_engine::lookahead::LookaheadMode;
use groupdraw_engine::session::DrawSession;
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Debug, Default, PartialEq, Eq)]
struct ModeTally {
    completed: usize,
    failed: usize,
    /// pool -> failures
    failed_in_pool: BTreeMap<u8, usize>,
}

pub fn handle_sim_command(
    draws: usize,
    seed: Option<u64>,
    pools: Option<String>,
    lookahead: Option<LookaheadMode>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if draws == 0 {
        return Err(CliError::InvalidInput("draws must be >= 1".to_string()));
    }
    let cfg = load_config()?;
    let base_seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let pools = pools.or(cfg.pools);
    let table = load_pool_table(pools.as_deref(), base_seed)?;
    let modes = match lookahead {
        Some(m) => vec![m],
        None => vec![LookaheadMode::Backtracking, LookaheadMode::Greedy],
    };

    writeln!(out, "Sim: {} draws per mode (base seed {})", draws, base_seed)?;
    for mode in modes {
        let engine = PoolAssignmentEngine::with_mode(mode);
        let mut tally = ModeTally::default();
        for i in 0..draws {
            let mut session =
                DrawSession::new_with_seed(table.clone(), engine, base_seed.wrapping_add(i as u64));
            match session.run_to_completion() {
                Ok(()) => tally.completed += 1,
                Err(DrawError::NoValidGroup { .. }) => {
                    tally.failed += 1;
                    *tally
                        .failed_in_pool
                        .entry(session.completed_pool() + 1)
                        .or_default() += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
        let pct = tally.failed as f64 / draws as f64 * 100.0;
        writeln!(
            out,
            "{:<13}completed={} failed={} ({:.1}% failed)",
            mode.as_str(),
            tally.completed,
            tally.failed,
            pct
        )?;
        if !tally.failed_in_pool.is_empty() {
            let by_pool: Vec<String> = tally
                .failed_in_pool
                .iter()
                .map(|(pool, n)| format!("pool {}: {}", pool, n))
                .collect();
            writeln!(out, "  failures by pool: {}", by_pool.join(", "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_draws_rejected() {
        let mut out = Vec::new();
        let result = handle_sim_command(0, Some(1), None, None, &mut out);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn counts_add_up_per_mode() {
        let mut out = Vec::new();
        handle_sim_command(5, Some(11), None, None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text
            .lines()
            .filter(|l| l.contains("completed="))
            .collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("backtracking"));
        assert!(lines[1].starts_with("greedy"));
        for line in lines {
            let num = |key: &str| -> usize {
                let start = line.find(key).unwrap() + key.len();
                line[start..]
                    .split_whitespace()
                    .next()
                    .unwrap()
                    .parse()
                    .unwrap()
            };
            assert_eq!(num("completed=") + num("failed="), 5);
        }
    }
}
