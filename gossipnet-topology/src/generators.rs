use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::Rng;

use gossipnet_core::{ConfigurationError, GraphKind, Topology};

/// Rewiring probability for the additive small-world generator. Fixed, not
/// exposed as a parameter, matching the one call site in the original
/// simulator (`newman_watts_strogatz_graph(n, m, 0.1)`).
const SMALLWORLD_BETA: f64 = 0.1;

/// Builds the overlay graph for `graph`. This is the only place in the
/// workspace that draws topology-shaped randomness; callers are expected to
/// pass the simulation's own seeded RNG so the whole run stays reproducible
/// from a single seed.
pub fn generate(graph: GraphKind, n: usize, rng: &mut StdRng) -> Result<Topology, ConfigurationError> {
    match graph {
        GraphKind::SmallWorld { m } => newman_watts_strogatz(n, m, rng),
        GraphKind::Barabasi { m } => barabasi_albert(n, m, rng),
        GraphKind::Complete => complete(n),
    }
}

/// Additive small-world graph: a ring lattice connecting each node to its
/// `m / 2` nearest neighbors on each side, then independently for every
/// lattice edge, with probability [`SMALLWORLD_BETA`], one extra edge to a
/// uniformly random non-adjacent node. Edges are only ever added, never
/// rewired away, so — unlike Watts-Strogatz proper — the ring backbone
/// always keeps the graph connected.
fn newman_watts_strogatz(n: usize, m: usize, rng: &mut StdRng) -> Result<Topology, ConfigurationError> {
    if n == 0 {
        return Err(ConfigurationError::InvalidAgentCount(n));
    }
    if m == 0 || m >= n {
        return Err(ConfigurationError::InvalidSmallWorldNeighbors { m, n });
    }

    let mut adjacency: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    let mut lattice_edges = Vec::new();
    for offset in 1..=(m / 2) {
        for i in 0..n {
            let j = (i + offset) % n;
            if adjacency[i].insert(j) {
                adjacency[j].insert(i);
                lattice_edges.push((i, j));
            }
        }
    }

    for (u, _v) in lattice_edges {
        if rng.gen::<f64>() >= SMALLWORLD_BETA {
            continue;
        }
        if adjacency[u].len() >= n - 1 {
            continue;
        }
        loop {
            let w = rng.gen_range(0..n);
            if w != u && !adjacency[u].contains(&w) {
                adjacency[u].insert(w);
                adjacency[w].insert(u);
                break;
            }
        }
    }

    let edges = adjacency
        .iter()
        .enumerate()
        .flat_map(|(i, neighbors)| neighbors.iter().filter(move |&&j| j > i).map(move |&j| (i, j)));
    Topology::from_edges(n, edges)
}

/// Barabási-Albert preferential attachment: `m` seed nodes start with no
/// edges between them; each subsequent node attaches to `m` distinct
/// existing nodes sampled from a "repeated nodes" multiset, where every
/// node appears once per edge it already holds — so a uniform draw from the
/// multiset is equivalent to a degree-weighted draw over the graph.
fn barabasi_albert(n: usize, m: usize, rng: &mut StdRng) -> Result<Topology, ConfigurationError> {
    if n == 0 {
        return Err(ConfigurationError::InvalidAgentCount(n));
    }
    if m == 0 || m >= n {
        return Err(ConfigurationError::InvalidBarabasiAttachment { m, n });
    }

    let mut edges = Vec::new();
    let mut repeated_nodes: Vec<usize> = Vec::new();
    let mut targets: Vec<usize> = (0..m).collect();

    for source in m..n {
        for &target in &targets {
            edges.push((source, target));
        }
        repeated_nodes.extend(targets.iter().copied());
        repeated_nodes.extend(std::iter::repeat(source).take(m));
        targets = random_subset(rng, &repeated_nodes, m);
    }

    Topology::from_edges(n, edges)
}

/// Draws `m` distinct values from `multiset` by repeated uniform sampling
/// with rejection, exactly as `networkx`'s internal `_random_subset` does.
fn random_subset(rng: &mut StdRng, multiset: &[usize], m: usize) -> Vec<usize> {
    let mut picked = BTreeSet::new();
    while picked.len() < m {
        let idx = rng.gen_range(0..multiset.len());
        picked.insert(multiset[idx]);
    }
    picked.into_iter().collect()
}

/// `K_n`: every pair of agents connected.
fn complete(n: usize) -> Result<Topology, ConfigurationError> {
    if n == 0 {
        return Err(ConfigurationError::InvalidAgentCount(n));
    }
    let edges = (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j)));
    Topology::from_edges(n, edges)
}
