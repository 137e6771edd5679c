//! Command-line argument definitions.

use crate::config::Config;
use clap::{Args, Parser, Subcommand};
use lastturn_engine::outcome::Outcome;

#[derive(Parser, Debug)]
#[command(
    name = "lastturn",
    version,
    about = "Last Turn: a two-sided card battle against the clock"
)]
pub struct LastTurnCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Match parameters accepted by `play` and `sim`. Anything left unset falls
/// back to the layered configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct MatchArgs {
    /// Slots per side (1-8)
    #[arg(long)]
    pub board_size: Option<usize>,
    /// Whole-match time in seconds
    #[arg(long)]
    pub total_time: Option<u32>,
    /// Per-placement time in seconds
    #[arg(long)]
    pub action_time: Option<u32>,
    /// Player display name
    #[arg(long)]
    pub name: Option<String>,
    /// Opponent deck shuffle seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// Opponent policy (baseline, first_fit)
    #[arg(long)]
    pub ai: Option<String>,
}

impl MatchArgs {
    /// Overlays the flags that were given onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(v) = self.board_size {
            config.board_size = v;
        }
        if let Some(v) = self.total_time {
            config.total_time_secs = v;
        }
        if let Some(v) = self.action_time {
            config.action_time_secs = v;
        }
        if let Some(v) = &self.name {
            config.player_name = v.clone();
        }
        if let Some(v) = self.seed {
            config.seed = Some(v);
        }
        if let Some(v) = &self.ai {
            config.ai = v.clone();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play one interactive match against the automated opponent
    Play {
        #[command(flatten)]
        opts: MatchArgs,
    },
    /// Run headless AI-vs-AI matches in virtual time
    Sim {
        /// Number of matches
        #[arg(long, default_value_t = 1)]
        matches: u32,
        /// JSONL file receiving one record per match
        #[arg(long)]
        output: Option<String>,
        #[command(flatten)]
        opts: MatchArgs,
    },
    /// Aggregate statistics from JSONL match records
    Stats {
        /// A JSONL file, or a directory searched for .jsonl files
        #[arg(long)]
        input: String,
        /// Only count matches with this outcome (victory, defeat or draw)
        #[arg(long)]
        outcome: Option<Outcome>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

impl Commands {
    pub const NAMES: [&'static str; 4] = ["play", "sim", "stats", "cfg"];
}
