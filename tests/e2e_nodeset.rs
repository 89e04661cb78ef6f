//! End-to-end tests for the node universe and typed attributes.
//!
//! Exercises node CRUD, attribute definition and index recycling, value
//! parsing against declared types, paging, and the JSON rendering of the
//! result envelope.

use plexnet::{AttributeType, AttributeValue, EngineConfig, NodeId, Nodeset, ResultCode};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ============================================================================
// Helper: a node-set with ids 1..=n and two attributes.
// ============================================================================

fn people(n: u32) -> Nodeset {
    let mut ns = Nodeset::new("people");
    for i in 1..=n {
        assert!(ns.add_node(NodeId(i)).success);
    }
    ns.define_attribute("age", AttributeType::Int);
    ns.define_attribute("initial", AttributeType::Char);
    ns
}

// ============================================================================
// 1. Node existence
// ============================================================================

#[test]
fn test_add_then_exists() {
    let mut ns = Nodeset::new("n");
    assert!(ns.add_node(NodeId(7)).success);
    assert_eq!(ns.check_node_exists(NodeId(7)).payload, Some(true));
    let again = ns.add_node(NodeId(7));
    assert!(!again.success);
    assert_eq!(again.code, ResultCode::NodeAlreadyExists);
    assert_eq!(ns.nbr_nodes(), 1);
}

#[test]
fn test_remove_missing_node() {
    let mut ns = people(2);
    assert_eq!(ns.remove_node(NodeId(9)).code, ResultCode::NodeNotFound);
    assert!(ns.remove_node(NodeId(1)).success);
    assert_eq!(ns.check_node_exists(NodeId(1)).payload, Some(false));
}

// ============================================================================
// 2. Attribute lifecycle
// ============================================================================

#[test]
fn test_define_set_get_undefine() {
    let mut ns = people(3);
    assert!(ns.set_attribute(NodeId(1), "age", "5").success);
    assert_eq!(ns.get_attribute(NodeId(1), "age").payload, Some(AttributeValue::Int(5)));

    assert!(ns.undefine_attribute("age").success);
    assert_eq!(ns.get_attribute(NodeId(1), "age").code, ResultCode::AttributeNotFound);
}

#[test]
fn test_define_collision_and_bad_type() {
    let mut ns = people(1);
    assert_eq!(ns.define_attribute("age", AttributeType::Float).code, ResultCode::AttributeNameExists);
    assert_eq!(ns.define_attribute_str("weight", "decimal").code, ResultCode::InvalidAttributeType);
    assert!(ns.define_attribute_str("weight", "Double").success);
}

#[test]
fn test_undefine_then_define_reuses_index() {
    let mut ns = people(1);
    let weight = ns.define_attribute("weight", AttributeType::Float).payload.unwrap();
    assert!(ns.undefine_attribute("weight").success);
    let height = ns.define_attribute("height", AttributeType::Float).payload.unwrap();
    assert_eq!(weight, height);
}

#[test]
fn test_type_mismatch_leaves_value() {
    let mut ns = people(1);
    ns.set_attribute(NodeId(1), "age", "30");
    let res = ns.set_attribute(NodeId(1), "age", "thirty");
    assert_eq!(res.code, ResultCode::AttributeTypeMismatch);
    let res = ns.set_attribute_value(NodeId(1), "age", AttributeValue::Float(1.5));
    assert_eq!(res.code, ResultCode::AttributeTypeMismatch);
    assert_eq!(ns.get_attribute(NodeId(1), "age").payload, Some(AttributeValue::Int(30)));
}

#[test]
fn test_node_attributes_listing() {
    let mut ns = people(1);
    ns.set_attribute(NodeId(1), "initial", "Q");
    ns.set_attribute(NodeId(1), "age", "41");
    let attrs = ns.get_node_attributes(NodeId(1)).payload.unwrap();
    assert_eq!(
        attrs,
        vec![
            ("age".to_string(), AttributeValue::Int(41)),
            ("initial".to_string(), AttributeValue::Char('Q')),
        ]
    );
    assert!(ns.remove_attribute(NodeId(1), "age").success);
    assert_eq!(ns.remove_attribute(NodeId(1), "age").code, ResultCode::AttributeNotFound);
    assert_eq!(ns.info().payload.unwrap().nbr_nodes_with_attributes, 1);
    assert!(ns.remove_attribute(NodeId(1), "initial").success);
    assert_eq!(ns.info().payload.unwrap().nbr_nodes_with_attributes, 0);
}

// ============================================================================
// 3. Paging and indexed access
// ============================================================================

#[test]
fn test_paging_messages() {
    let ns = people(5);
    let all = ns.get_all_nodes(0, None);
    assert_eq!(all.payload.as_ref().map(Vec::len), Some(5));
    assert!(all.message.contains("All 5"));

    let page = ns.get_all_nodes(1, Some(2));
    assert_eq!(page.payload, Some(vec![NodeId(2), NodeId(3)]));

    let beyond = ns.get_all_nodes(10, Some(2));
    assert!(beyond.success);
    assert!(beyond.message.contains("beyond range"));

    let empty = Nodeset::new("e").get_all_nodes(0, None);
    assert!(empty.message.contains("no nodes"));
}

#[test]
fn test_index_lookup_with_and_without_cache() {
    for cache in [true, false] {
        let config = EngineConfig::default().with_cache_node_ids(cache);
        let mut ns = Nodeset::with_config("n", &config);
        for id in [30, 10, 20] {
            ns.add_node(NodeId(id));
        }
        assert_eq!(ns.node_id_by_index(0).payload, Some(NodeId(10)));
        ns.add_node(NodeId(5));
        assert_eq!(ns.node_id_by_index(0).payload, Some(NodeId(5)));
        assert_eq!(ns.node_id_by_index(4).code, ResultCode::InvalidArgument);
    }
}

// ============================================================================
// 4. Envelope rendering
// ============================================================================

#[test]
fn test_envelope_serializes() {
    let mut ns = people(1);
    ns.set_attribute(NodeId(1), "age", "3");
    let json = serde_json::to_value(ns.get_attribute(NodeId(1), "age")).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["code"], "Ok");
    assert_eq!(json["payload"]["type"], "int");
    assert_eq!(json["payload"]["value"], 3);

    let failure = serde_json::to_value(ns.get_attribute(NodeId(2), "age")).unwrap();
    assert_eq!(failure["code"], "NodeNotFound");
    assert!(failure.get("payload").is_none());
}

// ============================================================================
// 5. Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_set_then_get(values in proptest::collection::vec(any::<i32>(), 1..40)) {
        let mut ns = Nodeset::new("p");
        ns.define_attribute("v", AttributeType::Int);
        for (i, v) in values.iter().enumerate() {
            let id = NodeId(i as u32);
            ns.add_node(id);
            prop_assert!(ns.set_attribute(id, "v", &v.to_string()).success);
        }
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(ns.get_attribute(NodeId(i as u32), "v").payload, Some(AttributeValue::Int(*v)));
        }
    }
}
