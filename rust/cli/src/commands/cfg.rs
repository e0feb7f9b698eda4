//! Configuration command handler.
//!
//! Prints every setting with the layer it came from (default, file or env).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "lookahead": {
//!     "value": "backtracking",
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "lookahead": {
            "value": config.lookahead,
            "source": sources.lookahead,
        },
        "max_attempts": {
            "value": config.max_attempts,
            "source": sources.max_attempts,
        },
        "pools": {
            "value": config.pools,
            "source": sources.pools,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
