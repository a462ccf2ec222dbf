use gossipnet_core::{BlockCloseEvent, SimulationCompleteEvent};

use crate::duration::humanize;

/// Consumes the two events a `Simulation::run` call produces. Implemented
/// by `ConsoleReporter` below; a caller that wants machine-readable output
/// instead (JSON lines, a metrics sink) implements the same trait rather
/// than threading formatting concerns into `gossipnet-core`.
pub trait Reporter {
    fn on_block_close(&mut self, event: &BlockCloseEvent);
    fn on_complete(&mut self, event: &SimulationCompleteEvent);
}

/// Prints one line per closed block plus a final summary, mirroring the
/// original simulator's stdout output. `quiet` suppresses the per-block
/// lines but keeps the final summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        ConsoleReporter { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn on_block_close(&mut self, event: &BlockCloseEvent) {
        if self.quiet {
            return;
        }
        println!(
            "(t:{}) Block #{} has been closed by agent {}",
            humanize(event.virtual_time, 3),
            event.block_height,
            event.closing_agent_id
        );
        println!(
            "      It took {} and {} epochs to close the block.",
            humanize(event.delta_t_since_prev_close, 3),
            event.epochs_since_prev_close
        );
        println!(
            "      The current Global Model has {} experience.",
            humanize(event.cumulative_experience, 3)
        );
        println!(
            "      There were {} direct messages sent over the network",
            event.direct_messages_since_start
        );
    }

    fn on_complete(&mut self, event: &SimulationCompleteEvent) {
        println!();
        println!("===================================");
        println!("Simulation Complete:   ({})", humanize(event.wall_clock_secs, 3));
        println!("===================================");
        println!("Simulated time: {}", humanize(event.virtual_time_total, 3));
        println!("Completed blocks: {}", event.completed_block_count);
        println!("Avrg. time per block: {}", humanize(event.mean_time_per_block, 3));
        println!("Avrg. number of epochs per block: {}", event.mean_epochs_per_block);
        println!(
            "Years experience in current Global Model: {}",
            humanize(event.cumulative_experience, 3)
        );
        println!(
            "Avrg. number of direct messages sent per block: {}",
            event.mean_direct_messages_per_block
        );
        if event.terminated_early {
            log::warn!(
                "run stopped before reaching the requested block count (queue drained at t={})",
                event.virtual_time_total
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_close() -> BlockCloseEvent {
        BlockCloseEvent {
            virtual_time: 120.0,
            block_height: 3,
            closing_agent_id: 7,
            delta_t_since_prev_close: 60.0,
            epochs_since_prev_close: 1,
            cumulative_experience: 3_600.0,
            direct_messages_since_start: 4,
        }
    }

    fn sample_complete(terminated_early: bool) -> SimulationCompleteEvent {
        SimulationCompleteEvent {
            wall_clock_secs: 0.2,
            virtual_time_total: 600.0,
            completed_block_count: 5,
            mean_time_per_block: 120.0,
            mean_epochs_per_block: 2.0,
            cumulative_experience: 18_000.0,
            mean_direct_messages_per_block: 1.5,
            terminated_early,
        }
    }

    #[test]
    fn quiet_reporter_does_not_panic_on_block_close() {
        let mut reporter = ConsoleReporter::new(true);
        reporter.on_block_close(&sample_close());
    }

    #[test]
    fn verbose_reporter_does_not_panic_on_block_close_or_complete() {
        let mut reporter = ConsoleReporter::new(false);
        reporter.on_block_close(&sample_close());
        reporter.on_complete(&sample_complete(false));
        reporter.on_complete(&sample_complete(true));
    }
}
