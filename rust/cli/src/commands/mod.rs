//! Command handlers for the groupdraw CLI.
//!
//! Each command lives in its own module with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed as parameters
//! - Errors propagated via `CliError`
//!
//! # Example
//!
//! ```rust,no_run
//! use groupdraw_cli::commands::handle_cfg_command;
//! use std::io;
//!
//! let mut out = io::stdout();
//! let mut err = io::stderr();
//! handle_cfg_command(&mut out, &mut err).expect("Command failed");
//! ```

mod cfg;
mod draw;
mod pools;
mod sim;
mod step;
mod verify;

pub use cfg::handle_cfg_command;
pub use draw::{handle_draw_command, DrawOptions};
pub use pools::handle_pools_command;
pub use sim::handle_sim_command;
pub use step::handle_step_command;
pub use verify::handle_verify_command;

use crate::config::{self, Config};
use crate::error::CliError;
use crate::io_utils::read_text;
use chrono::Utc;
use groupdraw_engine::record::format_draw_id;
use groupdraw_engine::pool::PoolTable;
use groupdraw_engine::seeding::bundled_pool_table;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn load_config() -> Result<Config, CliError> {
    config::load().map_err(|e| CliError::Config(e.to_string()))
}

/// Pool table from a JSON file, or the bundled ranking data with playoff
/// winners drawn from `seed`.
fn load_pool_table(path: Option<&str>, seed: u64) -> Result<PoolTable, CliError> {
    match path {
        Some(p) => {
            let text = read_text(p).map_err(CliError::InvalidInput)?;
            Ok(PoolTable::from_json(&text)?)
        }
        None => Ok(bundled_pool_table(&mut ChaCha20Rng::seed_from_u64(seed))?),
    }
}

/// First draw id of the day, for draws not written to a log.
fn today_draw_id() -> String {
    format_draw_id(&Utc::now().format("%Y%m%d").to_string(), 1)
}
