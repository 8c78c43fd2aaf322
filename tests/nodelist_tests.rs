//! Integration tests for node list set algebra, matching, anchoring and diff.

use sbom_graph::error::{GraphErrorKind, MatchingErrorKind};
use sbom_graph::{
    Edge, EdgeType, HashAlgorithm, Node, NodeList, SbomGraphError, SoftwareIdentifierType,
};

/// Build a node list of bare packages with `contains` edges.
fn contains_list(ids: &[&str], edges: &[(&str, &[&str])], roots: &[&str]) -> NodeList {
    let mut nl = NodeList::new();
    for id in ids {
        nl.add_node(Node::new_package(*id));
    }
    for (from, to) in edges {
        nl.add_edge(Edge::new(*from, EdgeType::Contains, to.iter().copied()));
    }
    for root in roots {
        nl.add_root_element(*root);
    }
    nl
}

fn ids(nl: &NodeList) -> Vec<String> {
    let mut ids: Vec<String> = nl.node_ids().map(str::to_string).collect();
    ids.sort();
    ids
}

// ============================================================================
// Anchoring
// ============================================================================

#[test]
fn test_anchor_fragment_extends_existing_edge() {
    let mut nl = contains_list(&["root", "B", "C"], &[("root", &["B", "C"])], &["root"]);
    let fragment = NodeList::new().with_root("X");

    nl.relate_node_list_at_id(&fragment, "root", EdgeType::Contains)
        .unwrap();

    let edge = nl.get_edge_by_type("root", EdgeType::Contains).unwrap();
    assert_eq!(edge.to, vec!["B", "C", "X"]);
    assert_eq!(nl.edges.len(), 1);
    assert_eq!(nl.root_elements, vec!["root"]);
}

#[test]
fn test_anchor_brings_fragment_nodes_and_edges() {
    let mut nl = contains_list(&["app"], &[], &["app"]);
    let fragment = NodeList::new()
        .with_node(Node::new_file("src"))
        .with_node(Node::new_file("src/main.rs"))
        .with_edge(Edge::new("src", EdgeType::Contains, ["src/main.rs"]))
        .with_root("src");

    nl.relate_node_list_at_id(&fragment, "app", EdgeType::Contains)
        .unwrap();

    assert_eq!(ids(&nl), vec!["app", "src", "src/main.rs"]);
    assert_eq!(nl.node_descendants("app", 3).len(), 3);
    assert_eq!(nl.root_elements, vec!["app"]);
}

#[test]
fn test_anchor_keeps_existing_node_data() {
    let mut nl = NodeList::new()
        .with_node(Node::new_package("app"))
        .with_node(Node::new_package("lib").with_name("original"))
        .with_root("app");
    let fragment = NodeList::new()
        .with_node(Node::new_package("lib").with_name("incoming"))
        .with_root("lib");

    nl.relate_node_list_at_id(&fragment, "app", EdgeType::DependsOn)
        .unwrap();

    assert_eq!(nl.get_node_by_id("lib").unwrap().name, "original");
    assert!(nl
        .get_edge_by_type("app", EdgeType::DependsOn)
        .unwrap()
        .points_to("lib"));
}

#[test]
fn test_anchor_at_unknown_id_fails_without_changes() {
    let mut nl = contains_list(&["root"], &[], &["root"]);
    let before = nl.copy();
    let fragment = NodeList::new()
        .with_node(Node::new_package("X"))
        .with_root("X");

    let err = nl
        .relate_node_list_at_id(&fragment, "missing", EdgeType::Contains)
        .unwrap_err();

    assert!(matches!(
        err,
        SbomGraphError::Graph {
            source: GraphErrorKind::NodeNotFound(ref id),
            ..
        } if id == "missing"
    ));
    assert!(nl.equal(&before));
}

#[test]
fn test_relate_single_node() {
    let mut nl = contains_list(&["root"], &[], &["root"]);
    nl.relate_node_at_id(&Node::new_file("README"), "root", EdgeType::Contains)
        .unwrap();
    assert!(nl.contains_node("README"));
    assert!(nl.relate_node_at_id(&Node::new_file("x"), "nope", EdgeType::Contains).is_err());
}

// ============================================================================
// Set algebra
// ============================================================================

#[test]
fn test_add_augments_and_appends() {
    let mut base = NodeList::new()
        .with_node(Node::new_package("a").with_name("alpha"))
        .with_root("a");
    let other = NodeList::new()
        .with_node(
            Node::new_package("a")
                .with_name("ALPHA")
                .with_version("1.0"),
        )
        .with_node(Node::new_package("b"))
        .with_edge(Edge::new("a", EdgeType::DependsOn, ["b", "ghost"]))
        .with_root("b");

    base.add(&other);

    let a = base.get_node_by_id("a").unwrap();
    assert_eq!(a.name, "alpha");
    assert_eq!(a.version, "1.0");
    assert_eq!(base.root_elements, vec!["a", "b"]);
    assert_eq!(base.edges, vec![Edge::new("a", EdgeType::DependsOn, ["b"])]);
}

#[test]
fn test_union_updates_from_other() {
    let left = NodeList::new()
        .with_node(Node::new_package("a").with_name("left").with_version("1"))
        .with_node(Node::new_package("l"))
        .with_edge(Edge::new("a", EdgeType::Contains, ["l"]))
        .with_root("a");
    let right = NodeList::new()
        .with_node(Node::new_package("a").with_name("right"))
        .with_node(Node::new_package("r"))
        .with_edge(Edge::new("a", EdgeType::Contains, ["r"]))
        .with_root("a");

    let merged = left.union(&right);

    let a = merged.get_node_by_id("a").unwrap();
    assert_eq!(a.name, "right");
    assert_eq!(a.version, "1");
    assert_eq!(ids(&merged), vec!["a", "l", "r"]);
    assert_eq!(
        merged.get_edge_by_type("a", EdgeType::Contains).unwrap().to,
        vec!["l", "r"]
    );
    assert_eq!(merged.root_elements, vec!["a"]);

    // inputs untouched
    assert_eq!(left.get_node_by_id("a").unwrap().name, "left");
    assert_eq!(right.len(), 2);
}

#[test]
fn test_intersect_keeps_shared_nodes() {
    let left = contains_list(&["a", "b", "c"], &[("a", &["b", "c"])], &["a"]);
    let right = NodeList::new()
        .with_node(Node::new_package("a"))
        .with_node(Node::new_package("b").with_name("bee"))
        .with_node(Node::new_package("d"))
        .with_edge(Edge::new("a", EdgeType::Contains, ["d"]))
        .with_root("d");

    let shared = left.intersect(&right);

    assert_eq!(ids(&shared), vec!["a", "b"]);
    assert_eq!(shared.get_node_by_id("b").unwrap().name, "bee");
    assert_eq!(shared.edges, vec![Edge::new("a", EdgeType::Contains, ["b"])]);
    assert_eq!(shared.root_elements, vec!["a"]);
}

#[test]
fn test_intersect_with_empty_is_empty() {
    let left = contains_list(&["a", "b"], &[("a", &["b"])], &["a"]);
    let shared = left.intersect(&NodeList::new());
    assert!(shared.is_empty());
    assert!(shared.edges.is_empty());
    assert!(shared.root_elements.is_empty());
}

#[test]
fn test_remove_nodes_cleans_edges() {
    let mut nl = contains_list(
        &["a", "b", "c"],
        &[("a", &["b", "c"]), ("b", &["c"])],
        &["a", "b"],
    );

    nl.remove_nodes(&["b"]);

    assert_eq!(ids(&nl), vec!["a", "c"]);
    assert_eq!(nl.edges, vec![Edge::new("a", EdgeType::Contains, ["c"])]);
    // dangling roots wait for normalize
    assert_eq!(nl.root_elements, vec!["a", "b"]);
    nl.normalize();
    assert_eq!(nl.root_elements, vec!["a"]);
}

#[test]
fn test_remove_unknown_ids_is_noop() {
    let mut nl = contains_list(&["a", "b"], &[("a", &["b"])], &["a"]);
    let before = nl.copy();
    nl.remove_nodes(&["zzz"]);
    assert!(nl.equal(&before));
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_matching_purl_breaks_hash_tie() {
    let nl = NodeList::new()
        .with_node(
            Node::new_package("left")
                .with_hash(HashAlgorithm::Sha256, "abc")
                .with_purl("pkg:npm/left@1.0.0"),
        )
        .with_node(
            Node::new_package("right")
                .with_hash(HashAlgorithm::Sha256, "abc")
                .with_purl("pkg:npm/right@1.0.0"),
        );

    let candidate = Node::new_package("incoming")
        .with_hash(HashAlgorithm::Sha256, "abc")
        .with_purl("pkg:npm/right@1.0.0");
    let found = nl.get_matching_node(&candidate).unwrap().unwrap();
    assert_eq!(found.id, "right");

    let no_purl = Node::new_package("incoming").with_hash(HashAlgorithm::Sha256, "abc");
    let err = nl.get_matching_node(&no_purl).unwrap_err();
    assert!(err.is_more_than_one_match());
    assert!(matches!(
        err,
        SbomGraphError::Matching {
            source: MatchingErrorKind::MoreThanOneMatch { candidates: 2 },
            ..
        }
    ));
}

#[test]
fn test_matching_conflicting_hash_is_not_a_match() {
    let nl = NodeList::new().with_node(
        Node::new_file("f")
            .with_hash(HashAlgorithm::Sha1, "11")
            .with_hash(HashAlgorithm::Sha256, "aa"),
    );
    let candidate = Node::new_file("g")
        .with_hash(HashAlgorithm::Sha1, "11")
        .with_hash(HashAlgorithm::Sha256, "bb");
    assert!(nl.get_matching_node(&candidate).unwrap().is_none());
}

#[test]
fn test_matching_falls_back_to_purl() {
    let nl = NodeList::new()
        .with_node(Node::new_package("a").with_purl("pkg:cargo/serde@1.0.0"))
        .with_node(Node::new_package("b").with_purl("pkg:cargo/regex@1.10.0"));
    let candidate = Node::new_package("x").with_purl("pkg:cargo/serde@1.0.0");
    assert_eq!(nl.get_matching_node(&candidate).unwrap().unwrap().id, "a");

    let unknown = Node::new_package("x").with_purl("pkg:cargo/rand@0.8.0");
    assert!(nl.get_matching_node(&unknown).unwrap().is_none());
    assert!(nl.get_matching_node(&Node::new_package("x")).unwrap().is_none());
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_lookup_by_name_and_identifier() {
    let mut tagged = Node::new_package("a").with_name("openssl");
    tagged.add_identifier(SoftwareIdentifierType::Cpe23, "cpe:2.3:a:openssl:openssl:3.0.0");
    let nl = NodeList::new()
        .with_node(tagged)
        .with_node(Node::new_package("b").with_name("openssl"))
        .with_node(Node::new_package("c").with_name("zlib"));

    assert_eq!(nl.get_nodes_by_name("openssl").len(), 2);
    let by_cpe = nl.get_nodes_by_identifier(
        SoftwareIdentifierType::Cpe23,
        "cpe:2.3:a:openssl:openssl:3.0.0",
    );
    assert_eq!(by_cpe.len(), 1);
    assert_eq!(by_cpe[0].id, "a");
}

#[test]
fn test_purl_type_slice() {
    let nl = NodeList::new()
        .with_node(Node::new_package("app"))
        .with_node(Node::new_package("left-pad").with_purl("pkg:npm/left-pad@1.3.0"))
        .with_node(Node::new_package("lodash").with_purl("pkg:npm/lodash@4.17.21"))
        .with_node(Node::new_package("serde").with_purl("pkg:cargo/serde@1.0.0"))
        .with_edge(Edge::new("app", EdgeType::DependsOn, ["left-pad", "lodash", "serde"]))
        .with_edge(Edge::new("lodash", EdgeType::DependsOn, ["left-pad"]))
        .with_root("app");

    let npm = nl.get_nodes_by_purl_type("npm");
    assert_eq!(ids(&npm), vec!["left-pad", "lodash"]);
    assert_eq!(
        npm.edges,
        vec![Edge::new("lodash", EdgeType::DependsOn, ["left-pad"])]
    );
    assert!(npm.root_elements.contains(&"left-pad".to_string()));
    assert!(nl.get_nodes_by_purl_type("pypi").is_empty());
}

// ============================================================================
// Diff
// ============================================================================

#[test]
fn test_diff_added_node() {
    let before = contains_list(&["n1", "n2", "n3"], &[], &[]);
    let after = contains_list(&["n1", "n2", "n3", "n4"], &[], &[]);

    let diff = before.diff(&after);

    let added: Vec<&str> = diff.nodes.added.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(added, vec!["n4"]);
    assert!(diff.nodes.removed.is_empty());
    assert!(diff.nodes.node_diff.is_empty());
}

#[test]
fn test_diff_changed_name() {
    let before: NodeList = [Node::new_package("n1").with_name("A")].into_iter().collect();
    let after: NodeList = [Node::new_package("n1").with_name("B")].into_iter().collect();

    let diff = before.diff(&after);

    assert_eq!(diff.nodes.node_diff.len(), 1);
    let nd = &diff.nodes.node_diff[0];
    assert_eq!(nd.added.name, "B");
    assert_eq!(nd.removed.name, "");
    assert_eq!(nd.diff_count, 1);
}

#[test]
fn test_diff_of_identical_lists_is_empty() {
    let nl = contains_list(&["a", "b", "c"], &[("a", &["b", "c"])], &["a"]);
    let diff = nl.diff(&nl.copy());
    assert!(diff.is_empty());
    assert_eq!(diff.total(), 0);
}

#[test]
fn test_diff_edges_and_roots() {
    let before = contains_list(&["a", "b", "c"], &[("a", &["b"])], &["a"]);
    let after = contains_list(&["a", "b", "c"], &[("a", &["b", "c"])], &["a", "c"]);

    let diff = before.diff(&after);

    assert!(diff.nodes.added.is_empty());
    assert_eq!(diff.edges.added, vec![Edge::new("a", EdgeType::Contains, ["b", "c"])]);
    assert_eq!(diff.edges.removed, vec![Edge::new("a", EdgeType::Contains, ["b"])]);
    assert_eq!(diff.root_elements.added, vec!["c"]);
    assert!(diff.root_elements.removed.is_empty());
}
