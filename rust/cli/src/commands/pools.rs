//! Pools command handler.
//!
//! Builds the four seeding pools from ranking data. Playoff brackets are
//! resolved with the given seed, so the same seed always yields the same table.

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::formatters::format_pool_table;
use crate::io_utils::read_text;
use groupdraw_engine::seeding::{PoolBuilder, RankingData};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::io::Write;

pub fn handle_pools_command(
    seed: Option<u64>,
    ranking: Option<String>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let data = match ranking {
        Some(path) => RankingData::from_json(&read_text(&path).map_err(CliError::InvalidInput)?)?,
        None => RankingData::bundled()?,
    };
    let base_seed = seed.unwrap_or_else(rand::random);
    let builder = PoolBuilder::default();
    let winners = builder.resolve_playoffs(&data, &mut ChaCha20Rng::seed_from_u64(base_seed))?;
    let winner_codes: Vec<String> = winners.iter().map(|w| w.code.clone()).collect();
    let table = builder.build(&data, winners)?;

    match format {
        OutputFormat::Table => {
            if let Some(date) = &data.ranking_date {
                writeln!(out, "Ranking: {}", date)?;
            }
            writeln!(out, "{}", format_pool_table(&table))?;
            if !winner_codes.is_empty() {
                writeln!(out, "Playoff winners (seed {}): {}", base_seed, winner_codes.join(", "))?;
            }
        }
        OutputFormat::Json => {
            let json = table.to_json_pretty().map_err(std::io::Error::other)?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}
