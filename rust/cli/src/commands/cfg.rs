//! Configuration command handler.
//!
//! `lastturn cfg` prints the resolved configuration with the source of each
//! value (default, file, or environment).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "board_size": {
//!     "value": 4,
//!     "source": "default"
//!   },
//!   "seed": {
//!     "value": 42,
//!     "source": "env"
//!   },
//!   ...
//! }
//! ```

use crate::config::{self, ConfigResolved};
use crate::error::CliError;
use crate::ui;
use std::io::Write;

/// Loads the configuration from the environment and prints it as pretty JSON.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };
    write_resolved(&resolved, out)
}

fn write_resolved(resolved: &ConfigResolved, out: &mut dyn Write) -> Result<(), CliError> {
    let ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "player_name": {
            "value": config.player_name,
            "source": sources.player_name,
        },
        "board_size": {
            "value": config.board_size,
            "source": sources.board_size,
        },
        "total_time_secs": {
            "value": config.total_time_secs,
            "source": sources.total_time_secs,
        },
        "action_time_secs": {
            "value": config.action_time_secs,
            "source": sources.action_time_secs,
        },
        "ai": {
            "value": config.ai,
            "source": sources.ai,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
