//! Tie density of a one-mode layer.

use crate::model::Directionality;
use crate::network::Network;
use crate::outcome::OperationResult;
use crate::Result;

/// Possible ties among `n` nodes.
///
/// | Layer | Potential |
/// |-------|-----------|
/// | directed, no self-ties | n(n−1) |
/// | directed, self-ties | n² |
/// | undirected, no self-ties | n(n−1)/2 |
/// | undirected, self-ties | n(n+1)/2 |
pub fn potential_ties(n: u64, directionality: Directionality, selfties: bool) -> u64 {
    match (directionality, selfties) {
        (Directionality::Directed, false) => n * n.saturating_sub(1),
        (Directionality::Directed, true) => n * n,
        (Directionality::Undirected, false) => n * n.saturating_sub(1) / 2,
        (Directionality::Undirected, true) => n * (n + 1) / 2,
    }
}

fn try_density(network: &Network, layer: &str) -> Result<f64> {
    let layer = network.layer_ref(layer)?.as_one_mode()?;
    let n = network.nodeset().nbr_nodes() as u64;
    let potential = potential_ties(n, layer.directionality(), layer.selfties());
    if potential == 0 {
        return Ok(0.0);
    }
    Ok(layer.nbr_edges() as f64 / potential as f64)
}

/// Realized ties over potential ties, counted over the whole node-set.
pub fn density(network: &Network, layer: &str) -> OperationResult<f64> {
    OperationResult::from_result(try_density(network, layer), |d| format!("Density of '{layer}': {d}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::model::{NodeId, ValueType};
    use crate::outcome::ResultCode;

    #[test]
    fn test_potential_formulas() {
        assert_eq!(potential_ties(4, Directionality::Directed, false), 12);
        assert_eq!(potential_ties(4, Directionality::Directed, true), 16);
        assert_eq!(potential_ties(4, Directionality::Undirected, false), 6);
        assert_eq!(potential_ties(4, Directionality::Undirected, true), 10);
        assert_eq!(potential_ties(1, Directionality::Undirected, false), 0);
        assert_eq!(potential_ties(0, Directionality::Directed, true), 0);
    }

    #[test]
    fn test_undirected_density() {
        let mut net = Network::new("n", EngineConfig::default());
        net.add_layer_one_mode("u", Directionality::Undirected, ValueType::Binary, false);
        for i in 1..=4 {
            net.add_node(NodeId(i));
        }
        net.add_edge("u", NodeId(1), NodeId(2), 1.0, false);
        net.add_edge("u", NodeId(3), NodeId(4), 1.0, false);
        let d = density(&net, "u").payload.unwrap();
        assert!((d - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_two_mode() {
        let mut net = Network::new("n", EngineConfig::default());
        net.add_layer_one_mode("d", Directionality::Directed, ValueType::Binary, false);
        net.add_layer_two_mode("t");
        assert_eq!(density(&net, "d").payload, Some(0.0));
        assert_eq!(density(&net, "t").code, ResultCode::LayerNotOneMode);
    }
}
