use clap::{Parser, ValueEnum};

use gossipnet_core::GraphKind;

/// CLI surface for the gossip consensus simulator. Every construction and
/// run parameter the core exposes gets a flag here; unknown `--graph`
/// values are rejected by `clap`'s `ValueEnum` before `gossipnet_core` is
/// ever invoked, ahead of the library's own `ConfigurationError` check.
#[derive(Debug, Parser)]
#[command(name = "gossipnet", about = "Gossip-based consensus protocol simulator", version)]
pub struct Args {
    /// Number of simulated agents.
    #[arg(long = "agents", short = 'n', default_value_t = 100)]
    pub agents: usize,

    /// Overlay topology to simulate the gossip on.
    #[arg(long = "graph", value_enum, default_value = "smallworld")]
    pub graph: GraphArg,

    /// Neighbor count for `smallworld` (ignored otherwise).
    #[arg(long = "neighbors")]
    pub neighbors: Option<usize>,

    /// Preferential-attachment parameter for `barabasi` (ignored otherwise).
    #[arg(long = "attachment")]
    pub attachment: Option<usize>,

    /// Simulated seconds between an agent's consecutive broadcasts.
    #[arg(long = "interval", short = 't', default_value_t = 60.0)]
    pub interval: f64,

    /// Target pending-block size (block closure threshold). Defaults to
    /// the agent count, clamped to it if larger.
    #[arg(long = "block-size")]
    pub block_size: Option<usize>,

    /// Number of blocks to close before stopping.
    #[arg(long = "num-blocks", default_value_t = 5)]
    pub num_blocks: usize,

    /// Suppress per-block progress lines; the final summary still prints.
    #[arg(long = "quiet", short = 'q')]
    pub quiet: bool,

    /// Seed for the single pseudo-random source driving graph generation,
    /// event jitter and direct-message sampling.
    #[arg(long = "seed", default_value_t = 0)]
    pub seed: u64,

    /// Raise the log level (`-v` = debug, `-vv` = trace).
    #[arg(long = "verbose", short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// CLI-facing mirror of [`GraphKind`]; `m` is supplied separately via
/// `--neighbors`/`--attachment` since clap's `ValueEnum` can't carry
/// payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphArg {
    #[value(name = "smallworld")]
    SmallWorld,
    #[value(name = "barabasi")]
    Barabasi,
    #[value(name = "complete")]
    Complete,
}

impl Args {
    /// Resolves the `--graph`/`--neighbors`/`--attachment` trio into a
    /// single [`GraphKind`], defaulting the graph parameter to 0 when the
    /// matching flag is absent so `gossipnet_core::Config::new` reports a
    /// `ConfigurationError` instead of silently picking a value.
    pub fn graph_kind(&self) -> GraphKind {
        match self.graph {
            GraphArg::SmallWorld => GraphKind::SmallWorld {
                m: self.neighbors.unwrap_or(0),
            },
            GraphArg::Barabasi => GraphKind::Barabasi {
                m: self.attachment.unwrap_or(0),
            },
            GraphArg::Complete => GraphKind::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_to_smallworld_with_no_neighbor_count() {
        let args = Args::parse_from(["gossipnet"]);
        assert_eq!(args.agents, 100);
        assert!(matches!(args.graph_kind(), GraphKind::SmallWorld { m: 0 }));
    }

    #[test]
    fn neighbors_flag_feeds_smallworld_m() {
        let args = Args::parse_from(["gossipnet", "--graph", "smallworld", "--neighbors", "6"]);
        assert!(matches!(args.graph_kind(), GraphKind::SmallWorld { m: 6 }));
    }

    #[test]
    fn attachment_flag_feeds_barabasi_m() {
        let args = Args::parse_from(["gossipnet", "--graph", "barabasi", "--attachment", "3"]);
        assert!(matches!(args.graph_kind(), GraphKind::Barabasi { m: 3 }));
    }

    #[test]
    fn complete_graph_ignores_neighbor_and_attachment_flags() {
        let args = Args::parse_from(["gossipnet", "--graph", "complete", "--neighbors", "6"]);
        assert!(matches!(args.graph_kind(), GraphKind::Complete));
    }

    #[test]
    fn unknown_graph_value_is_rejected_at_parse_time() {
        let result = Args::try_parse_from(["gossipnet", "--graph", "mesh"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_count_increments_per_flag() {
        let args = Args::parse_from(["gossipnet", "-vv"]);
        assert_eq!(args.verbose, 2);
    }
}
