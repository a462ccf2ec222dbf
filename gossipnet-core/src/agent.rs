use std::collections::BTreeSet;

use crate::error::InvariantViolation;
use crate::stats::Stats;

/// Staleness threshold (in own epochs since the last successful
/// absorption) past which `receive_chain` triggers direct-message
/// deadlock recovery. This is a protocol constant, not a tunable.
pub const STALENESS_THRESHOLD: i64 = 15;

/// Maximum number of agents a single `send_direct_chain` call will poke.
pub const MAX_DIRECT_RECIPIENTS: usize = 3;

/// The in-progress set of contributor ids for the next block.
///
/// Represented as a `BTreeSet` rather than a `HashSet`: equality is plain
/// set equality either way, but the sorted iteration order is load-bearing
/// for reproducibility once `send_direct_chain` samples from it (see
/// `missing_ids`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingBlock(BTreeSet<usize>);

impl PendingBlock {
    pub fn singleton(id: usize) -> Self {
        let mut set = BTreeSet::new();
        set.insert(id);
        PendingBlock(set)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.0.contains(&id)
    }

    pub fn insert(&mut self, id: usize) -> bool {
        self.0.insert(id)
    }

    /// This pb's size with `me`'s own membership excluded, so that an
    /// agent's own contribution doesn't bias it against an otherwise
    /// equivalent peer view.
    pub fn effective_len(&self, me: usize) -> usize {
        if self.contains(me) {
            self.len() - 1
        } else {
            self.len()
        }
    }

    /// Ids present in `self` but absent from `other`, in ascending order.
    pub fn difference_ids(&self, other: &PendingBlock) -> Vec<usize> {
        self.0.difference(&other.0).copied().collect()
    }
}

/// One simulated participant. Owns a pending block and a closed chain, and
/// is driven entirely by the scheduler: all cross-agent effects (broadcast,
/// direct messaging) are orchestrated by `Simulation`, which holds the
/// agent arena, rather than by the agent reaching out to peers itself.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: usize,
    pub l: usize,
    pub pb: PendingBlock,
    pub chain: Vec<PendingBlock>,
    pub cur_epoch: u64,
    pub last_absorb_epoch: u64,
}

impl Agent {
    pub fn new(id: usize, l: usize) -> Self {
        Agent {
            id,
            l,
            pb: PendingBlock::default(),
            chain: Vec::new(),
            cur_epoch: 0,
            last_absorb_epoch: 0,
        }
    }

    /// Adds self to `pb` if missing and there's room, then closes the
    /// block if `pb` has reached `l`. Returns `Some((new_chain_len,
    /// epoch_at_close))` when a block was closed this call, so the caller
    /// can update `Stats` with the epoch count as of closure, before
    /// `cur_epoch` is reset.
    pub fn check_self_status(&mut self) -> Result<Option<(usize, u64)>, InvariantViolation> {
        if self.pb.len() > self.l {
            return Err(InvariantViolation::PendingBlockOverflow {
                agent: self.id,
                len: self.pb.len(),
                l: self.l,
            });
        }
        if self.pb.len() < self.l && !self.pb.contains(self.id) {
            self.pb.insert(self.id);
        }
        if self.pb.len() == self.l {
            let closed = std::mem::replace(&mut self.pb, PendingBlock::singleton(self.id));
            self.chain.push(closed);
            let epoch_at_close = self.cur_epoch;
            self.cur_epoch = 0;
            return Ok(Some((self.chain.len(), epoch_at_close)));
        }
        Ok(None)
    }

    /// Applies `process_received_chain`'s adoption policy, returning
    /// `true` iff this call absorbed the peer's pending block (chain
    /// replacement counts, since it overwrites `pb` too).
    pub fn process_received_chain(&mut self, other_chain: &[PendingBlock], other_pb: &PendingBlock) -> bool {
        match other_chain.len().cmp(&self.chain.len()) {
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Greater => {
                self.chain = other_chain.to_vec();
                self.pb = other_pb.clone();
                true
            }
            std::cmp::Ordering::Equal => {
                if other_pb.effective_len(self.id) > self.pb.effective_len(self.id) {
                    self.pb = other_pb.clone();
                    self.last_absorb_epoch = self.cur_epoch;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Whether this agent is stale enough (per `STALENESS_THRESHOLD`) to
    /// attempt direct-message recovery on its next `receive_chain`.
    pub fn is_stale(&self) -> bool {
        (self.cur_epoch as i64) - (self.last_absorb_epoch as i64) > STALENESS_THRESHOLD
    }
}

/// Bumps `stats` the first time `closed_chain_len` exceeds the previously
/// recorded block count — "first to observe" wins, per §4.1.
pub fn record_block_close(stats: &mut Stats, agent_id: usize, closed_chain_len: usize, epochs: u64) {
    if stats.completed_block_count < closed_chain_len {
        stats.completed_block_count = closed_chain_len;
        stats.completed_block_agent = Some(agent_id);
        stats.completed_block_epochs = epochs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_self_status_adds_self_and_closes_at_l() {
        let mut agent = Agent::new(0, 2);
        agent.pb.insert(7);
        agent.cur_epoch = 4;
        let closed = agent.check_self_status().unwrap();
        assert_eq!(closed, Some((1, 4)));
        assert_eq!(agent.chain.len(), 1);
        assert_eq!(agent.pb, PendingBlock::singleton(0));
        assert_eq!(agent.cur_epoch, 0);
    }

    #[test]
    fn check_self_status_noop_when_below_l_and_self_present() {
        let mut agent = Agent::new(3, 5);
        agent.pb.insert(3);
        agent.pb.insert(9);
        let closed = agent.check_self_status().unwrap();
        assert_eq!(closed, None);
        assert!(agent.pb.contains(3));
        assert_eq!(agent.pb.len(), 2);
    }

    #[test]
    fn check_self_status_rejects_overfull_pb() {
        let mut agent = Agent::new(0, 1);
        agent.pb.insert(1);
        agent.pb.insert(2);
        assert!(agent.check_self_status().is_err());
    }

    #[test]
    fn process_received_chain_ignores_shorter_chain() {
        let mut agent = Agent::new(0, 10);
        agent.chain.push(PendingBlock::singleton(0));
        let absorbed = agent.process_received_chain(&[], &PendingBlock::singleton(9));
        assert!(!absorbed);
        assert_eq!(agent.chain.len(), 1);
    }

    #[test]
    fn process_received_chain_adopts_longer_chain_wholesale() {
        let mut agent = Agent::new(0, 10);
        let mut other_pb = PendingBlock::default();
        other_pb.insert(9);
        let other_chain = vec![PendingBlock::singleton(1)];
        let absorbed = agent.process_received_chain(&other_chain, &other_pb);
        assert!(absorbed);
        assert_eq!(agent.chain, other_chain);
        assert_eq!(agent.pb, other_pb);
    }

    #[test]
    fn process_received_chain_compares_effective_length_on_tie() {
        // S5: A's pb = {B, C, D}, B's pb = {A, C, D} from A's perspective,
        // with A's own id (0) excluded from both -- effective lengths tie.
        let mut a = Agent::new(0, 10);
        a.pb.insert(1);
        a.pb.insert(2);
        a.pb.insert(3);
        let mut b_pb = PendingBlock::default();
        b_pb.insert(0);
        b_pb.insert(2);
        b_pb.insert(3);
        let absorbed = a.process_received_chain(&[], &b_pb);
        assert!(!absorbed);
        assert!(a.pb.contains(1) && !a.pb.contains(0));
    }

    #[test]
    fn process_received_chain_adopts_strictly_longer_pb_on_tie() {
        let mut a = Agent::new(0, 10);
        a.pb.insert(1);
        let mut bigger = PendingBlock::default();
        bigger.insert(1);
        bigger.insert(2);
        bigger.insert(3);
        let absorbed = a.process_received_chain(&[], &bigger);
        assert!(absorbed);
        assert_eq!(a.pb, bigger);
        assert_eq!(a.last_absorb_epoch, a.cur_epoch);
    }

    #[test]
    fn effective_length_excludes_self() {
        let mut pb = PendingBlock::default();
        pb.insert(5);
        pb.insert(6);
        assert_eq!(pb.effective_len(5), 1);
        assert_eq!(pb.effective_len(99), 2);
    }

    #[test]
    fn is_stale_uses_signed_arithmetic_across_a_reset() {
        let mut agent = Agent::new(0, 10);
        agent.last_absorb_epoch = 20;
        agent.cur_epoch = 0;
        assert!(!agent.is_stale());
        agent.cur_epoch = 36;
        assert!(agent.is_stale());
    }
}
