//! Executable entry point for the gossip consensus simulator. Thin by
//! design: parse flags, build a `gossipnet_core::Config`, generate the
//! overlay topology, run the simulation, and forward its events to a
//! `ConsoleReporter`. All protocol logic lives in `gossipnet-core`.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use gossipnet_core::{Config, SimError, Simulation};
use gossipnet_report::{ConsoleReporter, Reporter};

use cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = Config::new(
        args.agents,
        args.graph_kind(),
        args.interval,
        args.block_size,
        args.seed,
    )?;

    let mut topo_rng = StdRng::seed_from_u64(config.seed);
    let topology = gossipnet_topology::generate(config.graph, config.n, &mut topo_rng)?;

    log::info!(
        "starting simulation: {} agents, {:?}, interval={}, L={}",
        config.n,
        config.graph,
        config.broadcast_interval,
        config.l,
    );

    let mut sim = Simulation::new(&config, topology);
    let mut reporter = ConsoleReporter::new(args.quiet);

    let outcome = sim.run(args.num_blocks, |event| reporter.on_block_close(event))?;
    reporter.on_complete(&outcome.completed);

    Ok(())
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .init();
}
