use thiserror::Error;

/// Errors raised while building or configuring a [`crate::Config`] or a
/// [`crate::Topology`]. These are user/config errors: they are raised during
/// construction and prevent any event from ever being scheduled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("agent count must be positive, got {0}")]
    InvalidAgentCount(usize),

    #[error("block size L must be positive, got {0}")]
    InvalidBlockSize(usize),

    #[error("unknown graph type {0:?}")]
    UnknownGraphType(String),

    #[error("smallworld neighbor count m must be in (0, n), got m={m} for n={n}")]
    InvalidSmallWorldNeighbors { m: usize, n: usize },

    #[error("barabasi attachment parameter m must be in (0, n), got m={m} for n={n}")]
    InvalidBarabasiAttachment { m: usize, n: usize },
}

/// Protocol-level bugs: conditions that §8 of the design declares can never
/// legitimately occur. Unlike [`ConfigurationError`], these abort the run
/// immediately rather than being surfaced to a caller to retry with
/// different input — there is no valid input that triggers them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("agent {agent} pending block has {len} members, exceeding L={l}")]
    PendingBlockOverflow { agent: usize, len: usize, l: usize },

    #[error("scheduler popped time {popped} behind the last dispatched time {last}")]
    TimeWentBackwards { popped: f64, last: f64 },
}

/// Top-level error type for `gossipnet-core`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}
