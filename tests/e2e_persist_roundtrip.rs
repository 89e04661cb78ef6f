//! Persistence round trips: build a network, save it, load it back and
//! compare everything that was saved.
//!
//! Covers the plain text and gzip encodings, node-set files referenced from
//! the network file, node-set synthesis when no reference exists, and the
//! error codes reported for unreadable or malformed files.

use std::fs;
use std::path::Path;

use plexnet::persist::{
    FileFormat, load_network, load_nodeset, read_network, save_network, save_nodeset, write_network,
    write_nodeset,
};
use plexnet::{
    AttributeType, AttributeValue, Directionality, EngineConfig, Network, NodeId, Nodeset, ResultCode,
    Traversal, ValueType,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Helpers
// ============================================================================

/// Two nodes, one directed valued layer (1 → 2 = 3.5) and one hypergraph
/// layer with H1 = {1, 2}, plus one attribute.
fn seed_network() -> Network {
    let mut net = Network::new("trade", EngineConfig::default());
    net.add_layer_one_mode("exports", Directionality::Directed, ValueType::Valued, false);
    net.add_layer_two_mode("blocs");
    assert!(net.add_edge("exports", NodeId(1), NodeId(2), 3.5, true).success);
    assert!(net.add_hyperedge("blocs", "H1", &[NodeId(1), NodeId(2)], true).success);
    let ns = net.nodeset_mut();
    ns.define_attribute("gdp", AttributeType::Float);
    ns.define_attribute("landlocked", AttributeType::Bool);
    ns.set_attribute(NodeId(1), "gdp", "1.25e3");
    ns.set_attribute(NodeId(2), "landlocked", "true");
    net
}

fn network_text(net: &Network) -> String {
    let mut buf = Vec::new();
    write_network(net, None, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

fn nodeset_text(net: &Network) -> String {
    let mut buf = Vec::new();
    write_nodeset(net.nodeset(), &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

fn assert_same_network(a: &Network, b: &Network) {
    assert_eq!(a.name(), b.name());
    assert_eq!(network_text(a), network_text(b));
    assert_eq!(nodeset_text(a), nodeset_text(b));
}

fn save_and_load(net: &mut Network, dir: &Path, format: FileFormat) -> Network {
    let path = dir.join("trade.net");
    let saved = save_network(net, &path, format, Some(Path::new("trade.ns")));
    assert!(saved.success, "{}", saved.message);
    assert!(!net.is_modified());
    let loaded = load_network(&path, format, &EngineConfig::default());
    assert!(loaded.success, "{}", loaded.message);
    loaded.into_payload().unwrap()
}

// ============================================================================
// 1. Round trips
// ============================================================================

#[test]
fn test_text_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = seed_network();
    let loaded = save_and_load(&mut net, dir.path(), FileFormat::Text);

    assert_same_network(&net, &loaded);
    assert_eq!(loaded.get_edge_value("exports", NodeId(1), NodeId(2)).payload, Some(3.5));
    assert_eq!(loaded.check_edge_exists("exports", NodeId(2), NodeId(1)).payload, Some(false));
    assert_eq!(loaded.get_hyperedge_members("blocs", "H1").payload, Some(vec![NodeId(1), NodeId(2)]));
    assert_eq!(
        loaded.nodeset().get_attribute(NodeId(1), "gdp").payload,
        Some(AttributeValue::Float(1250.0))
    );
    assert_eq!(
        loaded.nodeset().get_attribute(NodeId(2), "landlocked").payload,
        Some(AttributeValue::Bool(true))
    );
    assert!(!loaded.is_modified());
}

#[cfg(feature = "gzip")]
#[test]
fn test_gzip_round_trip_matches_text() {
    let dir = tempfile::tempdir().unwrap();
    let text_dir = dir.path().join("text");
    let gz_dir = dir.path().join("gz");
    fs::create_dir_all(&text_dir).unwrap();
    fs::create_dir_all(&gz_dir).unwrap();

    let mut net = seed_network();
    let from_text = save_and_load(&mut net, &text_dir, FileFormat::Text);
    let from_gzip = save_and_load(&mut net, &gz_dir, FileFormat::Gzip);
    assert_same_network(&from_text, &from_gzip);

    // The gzip file is not readable as plain text.
    let raw = fs::read(gz_dir.join("trade.net")).unwrap();
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);
}

#[test]
fn test_symmetric_ties_written_once() {
    let mut net = Network::new("n", EngineConfig::default());
    net.add_layer_one_mode("u", Directionality::Undirected, ValueType::Valued, false);
    net.add_edge("u", NodeId(2), NodeId(1), 0.5, true);
    net.add_edge("u", NodeId(3), NodeId(1), 1.5, true);
    let text = network_text(&net);
    assert!(text.contains("1\t2;0.5\t3;1.5\n"), "{text}");
    assert!(!text.contains("\n2\t"), "{text}");

    let parsed = read_network(text.as_bytes(), &EngineConfig::default()).unwrap();
    let layer = parsed.layers[0].as_one_mode().unwrap();
    assert_eq!(layer.get_edge_value(NodeId(3), NodeId(1)), 1.5);
    assert_eq!(layer.nbr_edges(), 2);
}

#[test]
fn test_directed_multi_layer_file_layout() {
    let net = seed_network();
    let text = network_text(&net);
    assert_eq!(
        text,
        "Name: trade\n\
         \n\
         LayerMode: 2\n\
         LayerName: blocs\n\
         H1\t1\t2\n\
         \n\
         LayerMode: 1\n\
         LayerName: exports\n\
         Directionality: directed\n\
         ValueType: valued\n\
         Selfties: false\n\
         1\t2;3.5\n"
    );
}

// ============================================================================
// 2. Node-set handling
// ============================================================================

#[test]
fn test_nodeset_synthesized_without_reference() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bare.net");
    let mut net = seed_network();
    net.add_node(NodeId(99));
    assert!(save_network(&mut net, &path, FileFormat::Text, None).success);

    let loaded = load_network(&path, FileFormat::Text, &EngineConfig::default()).into_payload().unwrap();
    assert_eq!(loaded.nodeset().node_ids().to_vec(), vec![NodeId(1), NodeId(2)]);
    assert!(loaded.nodeset().attribute_definitions().is_empty());
}

#[test]
fn test_missing_nodes_added_from_layers() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("n.ns"), "people\n1\n").unwrap();
    fs::write(
        dir.path().join("n.net"),
        "Name: n\nNodesetFile: n.ns\nLayerMode: 1\nLayerName: k\nDirectionality: undirected\nValueType: binary\nSelfties: false\n1\t2\t3\n",
    )
    .unwrap();
    let loaded = load_network(&dir.path().join("n.net"), FileFormat::Text, &EngineConfig::default());
    let net = loaded.into_payload().unwrap();
    assert_eq!(net.nodeset().name(), "people");
    assert_eq!(net.nodeset().nbr_nodes(), 3);
    assert_eq!(net.get_node_alters(Some("k"), NodeId(3), Traversal::Both).payload, Some(vec![NodeId(1)]));
}

#[test]
fn test_standalone_nodeset_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.ns");
    let net = seed_network();
    assert!(save_nodeset(net.nodeset(), &path, FileFormat::Text).success);
    let ns = load_nodeset(&path, FileFormat::Text, &EngineConfig::default()).into_payload().unwrap();
    assert_eq!(ns.nbr_nodes(), 2);
    assert_eq!(ns.get_attribute(NodeId(1), "gdp").payload, Some(AttributeValue::Float(1250.0)));
}

// ============================================================================
// 3. Failures
// ============================================================================

#[test]
fn test_load_error_codes() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::default();

    let missing = load_network(&dir.path().join("absent.net"), FileFormat::Text, &config);
    assert_eq!(missing.code, ResultCode::LoadError);

    let bad = dir.path().join("bad.net");
    fs::write(&bad, "Name: n\nLayerMode: 1\nLayerName: x\n1\t2\n").unwrap();
    assert_eq!(load_network(&bad, FileFormat::Text, &config).code, ResultCode::FileFormatError);

    let dangling = dir.path().join("dangling.net");
    fs::write(&dangling, "Name: n\nNodesetFile: nowhere.ns\n").unwrap();
    assert_eq!(load_network(&dangling, FileFormat::Text, &config).code, ResultCode::LoadError);
}

#[test]
fn test_save_error_code() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = seed_network();
    let res = save_network(&mut net, &dir.path().join("no/such/dir/x.net"), FileFormat::Text, None);
    assert_eq!(res.code, ResultCode::SaveError);
    assert!(net.is_modified());
}

// ============================================================================
// 4. Names and values that must survive a reload
// ============================================================================

#[test]
fn test_separator_chars_rejected_and_saved_file_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = seed_network();
    let ns = net.nodeset_mut();
    ns.define_attribute("c", AttributeType::Char);
    ns.define_attribute("n", AttributeType::Int);
    for sep in ["\t", "\n", "\r"] {
        assert_eq!(ns.set_attribute(NodeId(1), "c", sep).code, ResultCode::AttributeTypeMismatch);
    }
    let res = ns.set_attribute_value(NodeId(1), "c", AttributeValue::Char('\t'));
    assert_eq!(res.code, ResultCode::AttributeTypeMismatch);
    assert!(ns.set_attribute(NodeId(1), "c", " ").success);
    assert!(ns.set_attribute(NodeId(1), "n", "7").success);

    let loaded = save_and_load(&mut net, dir.path(), FileFormat::Text);
    assert_same_network(&net, &loaded);
    assert_eq!(loaded.nodeset().get_attribute(NodeId(1), "c").payload, Some(AttributeValue::Char(' ')));
    assert_eq!(loaded.nodeset().get_attribute(NodeId(1), "n").payload, Some(AttributeValue::Int(7)));
}

#[test]
fn test_unwritable_names_fail_before_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tab.net");
    let mut net = Network::new("a\tb", EngineConfig::default());
    let res = save_network(&mut net, &path, FileFormat::Text, None);
    assert_eq!(res.code, ResultCode::InvalidArgument);
    assert!(!path.exists());

    assert_eq!(net.set_name(" padded").code, ResultCode::InvalidArgument);
    assert!(net.set_name("a b").success);
    assert!(net.nodeset_mut().set_name("a b").success);
    assert!(save_network(&mut net, &path, FileFormat::Text, Some(Path::new("tab.ns"))).success);
    let loaded = load_network(&path, FileFormat::Text, &EngineConfig::default()).into_payload().unwrap();
    assert_eq!(loaded.name(), "a b");

    let ns_path = dir.path().join("bad.ns");
    let mut ns = Nodeset::new("x\ny");
    assert_eq!(save_nodeset(&ns, &ns_path, FileFormat::Text).code, ResultCode::InvalidArgument);
    assert!(ns.set_name("people").success);
    assert!(save_nodeset(&ns, &ns_path, FileFormat::Text).success);
}

#[test]
fn test_empty_hyperedge_named_like_a_key_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = seed_network();
    assert!(net.add_hyperedge("blocs", "LayerMode: 2", &[], true).success);
    let loaded = save_and_load(&mut net, dir.path(), FileFormat::Text);
    assert_same_network(&net, &loaded);
    assert_eq!(loaded.get_hyperedge_members("blocs", "LayerMode: 2").payload, Some(vec![]));
    assert_eq!(loaded.nbr_layers(), 2);
}
