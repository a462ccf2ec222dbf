use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::agent::{self, Agent, MAX_DIRECT_RECIPIENTS};
use crate::config::Config;
use crate::error::{InvariantViolation, SimError};
use crate::stats::{BlockCloseEvent, SimulationCompleteEvent, Stats};
use crate::topology::Topology;

/// Per-event jitter added on top of `broadcast_interval`, matching the
/// original `np.random.rand()*.1` noise term.
const RESCHEDULE_JITTER: f64 = 0.1;

/// A scheduled broadcast. Ordered by ascending `time`; `seq` breaks ties
/// deterministically (insertion order), since two agents can be scheduled
/// for the exact same virtual time.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Event {
    time: f64,
    agent_id: usize,
    seq: u64,
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of a completed `Simulation::run` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub completed: SimulationCompleteEvent,
}

/// Owns the agent arena, the topology, the shared stats, the single seeded
/// RNG, and the event queue. This is the discrete-event scheduler: the
/// only mutable cross-agent state lives here, threaded explicitly into
/// every helper rather than reached for through globals.
pub struct Simulation {
    pub topology: Topology,
    pub agents: Vec<Agent>,
    pub stats: Stats,
    rng: StdRng,
    broadcast_interval: f64,
    queue: BinaryHeap<Reverse<Event>>,
    next_seq: u64,
    last_dispatched_time: f64,
}

impl Simulation {
    pub fn new(config: &Config, topology: Topology) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let agents = (0..config.n).map(|id| Agent::new(id, config.l)).collect();

        let mut next_seq = 0u64;
        let mut queue = BinaryHeap::with_capacity(config.n);
        for id in 0..config.n {
            let time = rng.gen::<f64>() * config.broadcast_interval;
            queue.push(Reverse(Event { time, agent_id: id, seq: next_seq }));
            next_seq += 1;
        }

        Simulation {
            topology,
            agents,
            stats: Stats::new(),
            rng,
            broadcast_interval: config.broadcast_interval,
            queue,
            next_seq,
            last_dispatched_time: 0.0,
        }
    }

    /// Runs the DES loop until `completed_block_count >= num_blocks` or the
    /// queue drains (which, since every dispatch reschedules itself, only
    /// happens if `num_blocks` is never reached). `on_block_close` is
    /// invoked once per newly observed block height, in virtual-time
    /// order, so a caller can forward it to a reporter.
    pub fn run(
        &mut self,
        num_blocks: usize,
        mut on_block_close: impl FnMut(&BlockCloseEvent),
    ) -> Result<RunOutcome, SimError> {
        let start = Instant::now();
        let mut last_block_count = 0usize;
        let mut last_block_time = 0.0f64;
        let mut epochs_total = 0u64;
        let mut total_experience = 0.0f64;
        let mut cur_time = 0.0f64;
        let mut terminated_early = false;

        loop {
            if self.stats.completed_block_count >= num_blocks {
                break;
            }
            let Some(Reverse(event)) = self.queue.pop() else {
                terminated_early = true;
                break;
            };
            if event.time < self.last_dispatched_time {
                return Err(SimError::Invariant(InvariantViolation::TimeWentBackwards {
                    popped: event.time,
                    last: self.last_dispatched_time,
                }));
            }
            self.last_dispatched_time = event.time;
            cur_time = event.time;

            self.dispatch(event.agent_id)?;

            let reschedule_time = cur_time + self.broadcast_interval + self.rng.gen::<f64>() * RESCHEDULE_JITTER;
            self.queue.push(Reverse(Event {
                time: reschedule_time,
                agent_id: event.agent_id,
                seq: self.next_seq,
            }));
            self.next_seq += 1;

            if last_block_count < self.stats.completed_block_count {
                last_block_count = self.stats.completed_block_count;
                let delta_t = cur_time - last_block_time;
                let epochs = (delta_t / self.broadcast_interval).ceil().max(0.0) as u64;
                let experience = delta_t * self.agents[0].l as f64;
                epochs_total += epochs;
                total_experience += experience;

                let block_event = BlockCloseEvent {
                    virtual_time: cur_time,
                    block_height: self.stats.completed_block_count,
                    closing_agent_id: self.stats.completed_block_agent.unwrap_or_default(),
                    delta_t_since_prev_close: delta_t,
                    epochs_since_prev_close: epochs,
                    cumulative_experience: total_experience,
                    direct_messages_since_start: self.stats.dir_message_count,
                };
                on_block_close(&block_event);
                last_block_time = cur_time;
            }
        }

        let completed_block_count = self.stats.completed_block_count.max(1);
        let completed = SimulationCompleteEvent {
            wall_clock_secs: start.elapsed().as_secs_f64(),
            virtual_time_total: cur_time,
            completed_block_count: self.stats.completed_block_count,
            mean_time_per_block: cur_time / completed_block_count as f64,
            mean_epochs_per_block: round2(epochs_total as f64 / completed_block_count as f64),
            cumulative_experience: total_experience,
            mean_direct_messages_per_block: round2(self.stats.dir_message_count as f64 / completed_block_count as f64),
            terminated_early,
        };
        Ok(RunOutcome { completed })
    }

    fn dispatch(&mut self, id: usize) -> Result<(), SimError> {
        let closed = self.agents[id].check_self_status()?;
        if let Some((closed_chain_len, epoch_at_close)) = closed {
            agent::record_block_close(&mut self.stats, id, closed_chain_len, epoch_at_close);
        }
        self.broadcast(id);
        Ok(())
    }

    fn broadcast(&mut self, id: usize) {
        let chain = self.agents[id].chain.clone();
        let pb = self.agents[id].pb.clone();
        let neighbors = self.topology.neighbors(id).to_vec();
        for neighbor in neighbors {
            self.receive_chain(neighbor, &chain, &pb);
        }
        self.agents[id].cur_epoch += 1;
    }

    fn receive_chain(&mut self, target: usize, other_chain: &[crate::agent::PendingBlock], other_pb: &crate::agent::PendingBlock) {
        self.agents[target].process_received_chain(other_chain, other_pb);
        if self.agents[target].is_stale() {
            self.send_direct_chain(target, other_pb);
        }
    }

    /// Test-only seam: `src/tests/scenarios.rs` needs to drive direct-message
    /// recovery directly instead of waiting for `is_stale()` to trip
    /// naturally.
    #[cfg(test)]
    pub(crate) fn send_direct_chain_for_test(&mut self, id: usize, reference_pb: &crate::agent::PendingBlock) {
        self.send_direct_chain(id, reference_pb);
    }

    fn send_direct_chain(&mut self, id: usize, reference_pb: &crate::agent::PendingBlock) {
        if self.agents[id].pb == *reference_pb {
            return;
        }
        self.agents[id].last_absorb_epoch = self.agents[id].cur_epoch;

        let missing = reference_pb.difference_ids(&self.agents[id].pb);
        if missing.is_empty() {
            return;
        }
        let k = missing.len().min(MAX_DIRECT_RECIPIENTS);
        let sample: Vec<usize> = missing.choose_multiple(&mut self.rng, k).copied().collect();

        let chain = self.agents[id].chain.clone();
        let pb = self.agents[id].pb.clone();
        for recipient in sample {
            self.agents[recipient].process_received_chain(&chain, &pb);
            self.stats.dir_message_count += 1;
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
