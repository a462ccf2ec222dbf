use crate::error::ConfigurationError;

/// Which generator builds the agent overlay. `gossipnet-topology` matches
/// on this to dispatch to the right algorithm; `gossipnet-core` itself
/// never constructs a graph, it only validates the shape of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    /// Newman-Watts-Strogatz with `m` nearest neighbors per side and a
    /// fixed 0.1 rewiring probability.
    SmallWorld { m: usize },
    /// Barabasi-Albert preferential attachment with parameter `m`.
    Barabasi { m: usize },
    /// All agents connected to each other.
    Complete,
}

impl GraphKind {
    pub fn parse(name: &str, m: Option<usize>) -> Result<Self, ConfigurationError> {
        match name {
            "smallworld" => Ok(GraphKind::SmallWorld {
                m: m.unwrap_or_default(),
            }),
            "barabasi" => Ok(GraphKind::Barabasi {
                m: m.unwrap_or_default(),
            }),
            "complete" => Ok(GraphKind::Complete),
            other => Err(ConfigurationError::UnknownGraphType(other.to_string())),
        }
    }
}

/// Construction parameters for a `Simulation`.
#[derive(Debug, Clone)]
pub struct Config {
    pub n: usize,
    pub graph: GraphKind,
    pub broadcast_interval: f64,
    pub l: usize,
    pub seed: u64,
}

impl Config {
    pub fn new(n: usize, graph: GraphKind, broadcast_interval: f64, l: Option<usize>, seed: u64) -> Result<Self, ConfigurationError> {
        if n == 0 {
            return Err(ConfigurationError::InvalidAgentCount(n));
        }
        let l = match l {
            Some(0) => return Err(ConfigurationError::InvalidBlockSize(0)),
            Some(l) => l.min(n),
            None => n,
        };
        match graph {
            GraphKind::SmallWorld { m } => {
                if m == 0 || m >= n {
                    return Err(ConfigurationError::InvalidSmallWorldNeighbors { m, n });
                }
            }
            GraphKind::Barabasi { m } => {
                if m == 0 || m >= n {
                    return Err(ConfigurationError::InvalidBarabasiAttachment { m, n });
                }
            }
            GraphKind::Complete => {}
        }
        Ok(Config {
            n,
            graph,
            broadcast_interval,
            l,
            seed,
        })
    }

    /// Advisory-only epoch ceiling mentioned by the design; never consulted
    /// by the scheduler's own termination condition.
    pub fn epoch_limit(&self) -> usize {
        self.n * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_l_to_n() {
        let cfg = Config::new(10, GraphKind::Complete, 1.0, Some(50), 1).unwrap();
        assert_eq!(cfg.l, 10);
    }

    #[test]
    fn defaults_l_to_n_when_absent() {
        let cfg = Config::new(10, GraphKind::Complete, 1.0, None, 1).unwrap();
        assert_eq!(cfg.l, 10);
    }

    #[test]
    fn rejects_zero_agents() {
        assert!(Config::new(0, GraphKind::Complete, 1.0, None, 1).is_err());
    }

    #[test]
    fn accepts_odd_smallworld_m() {
        // networkx's newman_watts_strogatz_graph tolerates an odd `m`; it
        // just yields one fewer ring connection per node than an even `m`
        // would (see `gossipnet-topology`'s generator for the `m / 2`
        // per-side construction).
        assert!(Config::new(10, GraphKind::SmallWorld { m: 3 }, 1.0, None, 1).is_ok());
    }

    #[test]
    fn rejects_smallworld_m_ge_n() {
        let err = Config::new(10, GraphKind::SmallWorld { m: 10 }, 1.0, None, 1).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidSmallWorldNeighbors { .. }));
    }

    #[test]
    fn rejects_barabasi_m_ge_n() {
        let err = Config::new(10, GraphKind::Barabasi { m: 10 }, 1.0, None, 1).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidBarabasiAttachment { .. }));
    }

    #[test]
    fn graph_kind_parse_rejects_unknown_type() {
        assert!(GraphKind::parse("mesh", None).is_err());
    }
}
