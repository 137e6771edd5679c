//! Command handler modules for the Last Turn CLI.
//!
//! Each command lives in its own module with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed in, never taken from the process
//! - Errors propagated via the `CliError` enum and mapped to exit codes by `run`

pub mod cfg;
pub mod play;
pub mod sim;
pub mod stats;

pub use cfg::handle_cfg_command;
pub use play::handle_play_command;
pub use sim::handle_sim_command;
pub use stats::handle_stats_command;
