/// Process-wide counters, mutated by agents on block closure and direct
/// send. Owned by `Simulation` and threaded explicitly into every call
/// that can mutate it, rather than kept as ambient global state.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub completed_block_count: usize,
    pub completed_block_agent: Option<usize>,
    pub completed_block_epochs: u64,
    pub dir_message_count: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Emitted once per newly-observed block closure, consumed by a reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockCloseEvent {
    pub virtual_time: f64,
    pub block_height: usize,
    pub closing_agent_id: usize,
    pub delta_t_since_prev_close: f64,
    pub epochs_since_prev_close: u64,
    pub cumulative_experience: f64,
    pub direct_messages_since_start: u64,
}

/// Emitted once, when the run loop stops.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationCompleteEvent {
    pub wall_clock_secs: f64,
    pub virtual_time_total: f64,
    pub completed_block_count: usize,
    pub mean_time_per_block: f64,
    pub mean_epochs_per_block: f64,
    pub cumulative_experience: f64,
    pub mean_direct_messages_per_block: f64,
    pub terminated_early: bool,
}
