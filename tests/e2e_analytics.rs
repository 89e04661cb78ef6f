//! End-to-end analytics: degree, density, components, shortest paths and
//! seeded random sampling over mixed one-mode / two-mode networks.

use plexnet::analytics::{
    component_groups, connected_components, degree_centrality, density, random_alter, random_edge, random_node,
    shortest_path,
};
use plexnet::{Directionality, EngineConfig, Network, NodeId, ResultCode, Traversal, ValueType};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ============================================================================
// Helper: two friendship triangles, a bridge in a directed layer, and a
// two-mode layer of committees.
// ============================================================================

fn office() -> Network {
    let mut net = Network::new("office", EngineConfig::default());
    net.add_layer_one_mode("friends", Directionality::Undirected, ValueType::Binary, false);
    net.add_layer_one_mode("reports", Directionality::Directed, ValueType::Binary, false);
    net.add_layer_two_mode("committees");
    for (a, b) in [(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4)] {
        net.add_edge("friends", NodeId(a), NodeId(b), 1.0, true);
    }
    net.add_edge("reports", NodeId(3), NodeId(4), 1.0, true);
    net.add_hyperedge("committees", "safety", &[NodeId(1), NodeId(6)], true);
    net.add_hyperedge("committees", "social", &[NodeId(1), NodeId(6), NodeId(7)], true);
    net
}

fn int(net: &Network, id: u32, attr: &str) -> Option<i32> {
    net.nodeset().get_attribute(NodeId(id), attr).payload.and_then(|v| v.as_int())
}

// ============================================================================
// 1. Degree
// ============================================================================

#[test]
fn test_degree_written_for_every_node() {
    let mut net = office();
    let res = degree_centrality(&mut net, "friends", Traversal::Both, "deg");
    assert_eq!(res.payload, Some(7));
    assert_eq!(int(&net, 1, "deg"), Some(2));
    assert_eq!(int(&net, 7, "deg"), Some(0));

    degree_centrality(&mut net, "committees", Traversal::Out, "co");
    assert_eq!(int(&net, 1, "co"), Some(2));
    assert_eq!(int(&net, 7, "co"), Some(2));
    assert_eq!(int(&net, 2, "co"), Some(0));
}

#[test]
fn test_degree_overwrites_previous_run() {
    let mut net = office();
    degree_centrality(&mut net, "reports", Traversal::In, "d");
    assert_eq!(int(&net, 4, "d"), Some(1));
    degree_centrality(&mut net, "reports", Traversal::Out, "d");
    assert_eq!(int(&net, 4, "d"), Some(0));
    assert_eq!(int(&net, 3, "d"), Some(1));
}

// ============================================================================
// 2. Density
// ============================================================================

#[test]
fn test_density_four_nodes_two_ties() {
    let mut net = Network::new("d", EngineConfig::default());
    net.add_layer_one_mode("u", Directionality::Undirected, ValueType::Binary, false);
    for i in 1..=4 {
        net.add_node(NodeId(i));
    }
    net.add_edge("u", NodeId(1), NodeId(2), 1.0, false);
    net.add_edge("u", NodeId(2), NodeId(3), 1.0, false);
    let d = density(&net, "u").payload.unwrap();
    assert!((d - 2.0 / 6.0).abs() < 1e-12, "{d}");
}

#[test]
fn test_density_directed_with_selfties() {
    let mut net = Network::new("d", EngineConfig::default());
    net.add_layer_one_mode("s", Directionality::Directed, ValueType::Binary, true);
    net.add_edge("s", NodeId(1), NodeId(1), 1.0, true);
    net.add_edge("s", NodeId(1), NodeId(2), 1.0, true);
    assert_eq!(density(&net, "s").payload, Some(0.5));
}

#[test]
fn test_density_rejects_two_mode() {
    let net = office();
    assert_eq!(density(&net, "committees").code, ResultCode::LayerNotOneMode);
}

// ============================================================================
// 3. Components
// ============================================================================

#[test]
fn test_components_per_layer() {
    let mut net = office();
    assert_eq!(component_groups(&net, "friends").unwrap().len(), 3);
    assert_eq!(connected_components(&mut net, "friends", "comp").payload, Some(3));
    assert_eq!(int(&net, 1, "comp"), Some(0));
    assert_eq!(int(&net, 5, "comp"), Some(1));
    assert_eq!(int(&net, 7, "comp"), Some(2));

    let committees = component_groups(&net, "committees").unwrap();
    assert_eq!(committees[0], vec![NodeId(1), NodeId(6), NodeId(7)]);
    assert_eq!(committees.len(), 5);
}

#[test]
fn test_components_on_empty_layer() {
    let mut net = office();
    net.clear_layer("friends");
    assert_eq!(connected_components(&mut net, "friends", "c").payload, Some(7));
}

// ============================================================================
// 4. Shortest path
// ============================================================================

#[test]
fn test_shortest_paths() {
    let net = office();
    assert_eq!(shortest_path(&net, Some("friends"), NodeId(1), NodeId(2)).payload, Some(1));
    assert_eq!(
        shortest_path(&net, Some("friends"), NodeId(1), NodeId(5)).code,
        ResultCode::PathNotFound
    );
    // friends 2-3, reports 3->4, friends 4-5
    assert_eq!(shortest_path(&net, None, NodeId(2), NodeId(5)).payload, Some(3));
    // committees connect 1 and 6 directly
    assert_eq!(shortest_path(&net, None, NodeId(2), NodeId(6)).payload, Some(2));
    assert_eq!(shortest_path(&net, None, NodeId(2), NodeId(2)).payload, Some(0));
}

// ============================================================================
// 5. Sampling
// ============================================================================

#[test]
fn test_sampling_is_repeatable_with_seed() {
    let net = office();
    let draw = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..10)
            .map(|_| random_node(&net, &mut rng).payload.unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(draw(11), draw(11));
}

#[test]
fn test_random_alter_stays_in_neighbourhood() {
    let net = office();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..30 {
        let alter = random_alter(&net, "friends", NodeId(4), Traversal::Both, &mut rng).payload.unwrap();
        assert!([NodeId(5), NodeId(6)].contains(&alter));
    }
}

#[test]
fn test_random_edges_exist() {
    let net = office();
    let mut rng = StdRng::seed_from_u64(9);
    for layer in ["friends", "reports", "committees"] {
        for attempts in [0, 25] {
            let (a, b) = random_edge(&net, layer, attempts, &mut rng).payload.unwrap();
            assert_eq!(net.check_edge_exists(layer, a, b).payload, Some(true), "{layer}: {a} -> {b}");
        }
    }
}

#[test]
fn test_random_edge_on_empty_layer() {
    let mut net = office();
    net.clear_layer("reports");
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(random_edge(&net, "reports", 5, &mut rng).code, ResultCode::EdgeNotFound);
}
