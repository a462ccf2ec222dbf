//! Human-readable progress reporting for the gossip consensus simulator.
//! Consumes the structured events `gossipnet-core::Simulation::run`
//! produces; kept in its own crate so the core protocol/scheduler code
//! never needs to format anything.

mod duration;
mod reporter;

pub use duration::humanize;
pub use reporter::{ConsoleReporter, Reporter};
