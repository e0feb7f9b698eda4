//! Command-line definitions.

use clap::{Parser, Subcommand, ValueEnum};
use groupdraw_engine::lookahead::LookaheadMode;

#[derive(Parser, Debug)]
#[command(name = "groupdraw", version, about = "Tournament group-stage draw simulator")]
pub struct GroupdrawCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a complete draw and print the groups
    Draw {
        #[arg(long)]
        seed: Option<u64>,
        /// backtracking (exact) or greedy (fast, approximate)
        #[arg(long)]
        lookahead: Option<LookaheadMode>,
        /// Pool table JSON; bundled ranking data when omitted
        #[arg(long)]
        pools: Option<String>,
        /// Append the draw record to this JSONL file
        #[arg(long)]
        output: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Fresh sessions to try when a draw runs into a dead end
        #[arg(long)]
        max_attempts: Option<u32>,
        /// Print the event log before the result
        #[arg(long)]
        events: bool,
    },
    /// Step through a draw from the keyboard
    Step {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        lookahead: Option<LookaheadMode>,
        #[arg(long)]
        pools: Option<String>,
    },
    /// Build the seeding pools from ranking data
    Pools {
        /// Seed for resolving playoff brackets
        #[arg(long)]
        seed: Option<u64>,
        /// Ranking JSON; bundled data when omitted
        #[arg(long)]
        ranking: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Check recorded draws against the draw rules
    Verify {
        #[arg(long)]
        input: Option<String>,
    },
    /// Run many draws and count dead ends per lookahead mode
    Sim {
        #[arg(long)]
        draws: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        pools: Option<String>,
        /// Only this mode; both when omitted
        #[arg(long)]
        lookahead: Option<LookaheadMode>,
    },
    /// Show the resolved configuration
    Cfg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
