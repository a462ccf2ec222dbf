//! End-to-end scenario tests (S2-S4, S6, and property 6 from the design's
//! testable properties; S1 lives next to `Simulation::run` in
//! `scheduler.rs` and S5 next to `Agent::process_received_chain` in
//! `agent.rs`, since each is most legible beside the code it exercises).
//!
//! The generator topologies used here are simplified stand-ins for the
//! real `smallworld`/`barabasi` algorithms in `gossipnet-topology` --
//! depending on that crate from here would be circular, and these
//! scenarios only need *a* graph with the right sparsity, not the exact
//! generator under test (that's `gossipnet-topology`'s own test suite).
