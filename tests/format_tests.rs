//! Integration tests for the format registry and the driver contracts.
//!
//! `IndentedTree` is a toy tree-shaped format: one node name per line,
//! nesting by two-space indentation. It goes through the same public API a
//! real CycloneDX-style driver would use.

use sbom_graph::error::{ErrorContext, FormatErrorKind, OptionContext};
use sbom_graph::{
    Degradation, Document, Edge, EdgeType, Format, FormatRegistry, GraphConfig, Metadata, Node,
    NodeIdGenerator, NodeList, Result, SbomGraphError, Serializer, TreeNode, Unserializer,
};
use std::io::{BufRead, BufReader, Read, Write};
use tracing_subscriber::EnvFilter;

const INDENT: &str = "  ";

fn tree_format() -> Format {
    Format::from("text/x-indented-tree;version=1.0")
}

struct IndentedTree {
    config: GraphConfig,
}

impl IndentedTree {
    fn write_tree(writer: &mut dyn Write, tree: &TreeNode, depth: usize) -> Result<()> {
        writeln!(writer, "{}{}", INDENT.repeat(depth), tree.node.name)?;
        for child in &tree.children {
            Self::write_tree(writer, child, depth + 1)?;
        }
        Ok(())
    }
}

impl Serializer for IndentedTree {
    fn serialize(&self, document: &Document, writer: &mut dyn Write) -> Result<()> {
        let flat = document
            .node_list
            .flatten_tree(&self.config.traversal)
            .context("writing indented tree")?;
        for tree in &flat.roots {
            Self::write_tree(writer, tree, 0)?;
        }
        Ok(())
    }
}

impl Unserializer for IndentedTree {
    fn unserialize(&self, reader: &mut dyn Read) -> Result<Document> {
        let mut generator = self.config.identifiers.generator();
        let mut node_list = NodeList::new();
        let mut parents: Vec<String> = Vec::new();

        for line in BufReader::new(reader).lines() {
            let line = line?;
            let name = line.trim_start();
            if name.is_empty() {
                continue;
            }
            let depth = (line.len() - name.len()) / INDENT.len();
            if depth > parents.len() {
                return Err(SbomGraphError::format(
                    "reading indented tree",
                    FormatErrorKind::Encoding(format!("line {name:?} is indented too far")),
                ));
            }
            parents.truncate(depth);

            let node = Node::new_package(generator.identifier(&["package", "auto"])).with_name(name);
            match parents.last() {
                Some(parent) => node_list.relate_node_at_id(&node, parent, EdgeType::Contains)?,
                None => {
                    node_list.add_node(node.clone());
                    node_list.add_root_element(node.id.clone());
                }
            }
            parents.push(node.id);
        }

        Ok(Document::with_node_list(Metadata::default(), node_list))
    }
}

/// Route library logs to the test harness; `RUST_LOG` overrides the filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sbom_graph=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn registry() -> FormatRegistry {
    let mut registry = FormatRegistry::with_native();
    let config = GraphConfig::builder().id_prefix("tree").build();
    registry.register_serializer(tree_format(), Box::new(IndentedTree { config: config.clone() }));
    registry.register_unserializer(tree_format(), Box::new(IndentedTree { config }));
    registry
}

fn sample_document() -> Document {
    let node_list = NodeList::new()
        .with_node(Node::new_package("app").with_name("app"))
        .with_node(Node::new_package("core").with_name("core"))
        .with_node(Node::new_package("util").with_name("util"))
        .with_node(Node::new_file("readme").with_name("README.md"))
        .with_edge(Edge::new("app", EdgeType::Contains, ["core", "readme"]))
        .with_edge(Edge::new("core", EdgeType::Contains, ["util"]))
        .with_root("app");
    let metadata = Metadata {
        name: "sample".to_string(),
        ..Metadata::default()
    };
    Document::with_node_list(metadata, node_list)
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_native_round_trip_through_registry() {
    init_tracing();
    let registry = registry();
    let document = sample_document();

    let mut buf = Vec::new();
    registry
        .write(&Format::NATIVE_JSON, &document, &mut buf)
        .unwrap();
    let read = registry
        .read(&Format::NATIVE_JSON, &mut buf.as_slice())
        .unwrap();

    assert_eq!(read, document);
}

#[test]
fn test_registry_lists_registered_formats() {
    let registry = registry();
    assert_eq!(registry.formats(), vec![&Format::NATIVE_JSON, &tree_format()]);
    assert!(registry.serializer(&Format::SPDX23_JSON).is_err());
}

#[test]
fn test_format_parsed_from_string_finds_driver() {
    let registry = registry();
    let parsed = Format::from(String::from("text/x-indented-tree;version=1.0"));
    assert_eq!(parsed.major(), "1");
    assert!(registry.unserializer(&parsed).is_ok());
}

// ============================================================================
// Tree-shaped drivers
// ============================================================================

#[test]
fn test_tree_writer_nests_contains_edges() {
    let registry = registry();
    let mut out = Vec::new();
    registry
        .write(&tree_format(), &sample_document(), &mut out)
        .unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "app\n  core\n    util\n  README.md\n"
    );
}

#[test]
fn test_tree_reader_anchors_children() {
    let registry = registry();
    let text = "app\n  core\n    util\n  README.md\nother\n";

    let document = registry.read(&tree_format(), &mut text.as_bytes()).unwrap();
    let nl = &document.node_list;

    assert_eq!(nl.len(), 5);
    assert_eq!(nl.root_elements, vec!["tree-package-auto--1", "tree-package-auto--5"]);
    assert_eq!(
        nl.get_edge_by_type("tree-package-auto--1", EdgeType::Contains)
            .unwrap()
            .to,
        vec!["tree-package-auto--2", "tree-package-auto--4"]
    );
    let util = nl.get_nodes_by_name("util");
    assert_eq!(util.len(), 1);
    assert_eq!(util[0].id, "tree-package-auto--3");
}

#[test]
fn test_tree_round_trip_keeps_shape() {
    let registry = registry();
    let mut out = Vec::new();
    registry
        .write(&tree_format(), &sample_document(), &mut out)
        .unwrap();
    let read = registry.read(&tree_format(), &mut out.as_slice()).unwrap();

    let mut again = Vec::new();
    registry.write(&tree_format(), &read, &mut again).unwrap();
    assert_eq!(out, again);
}

#[test]
fn test_tree_reader_rejects_bad_indentation() {
    let registry = registry();
    let err = registry
        .read(&tree_format(), &mut "app\n      deep\n".as_bytes())
        .unwrap_err();
    assert!(matches!(
        err,
        SbomGraphError::Format {
            source: FormatErrorKind::Encoding(_),
            ..
        }
    ));
}

#[test]
fn test_tree_writer_needs_root_elements() {
    let registry = registry();
    let mut document = sample_document();
    document.node_list.root_elements.clear();

    let err = registry
        .write(&tree_format(), &document, &mut Vec::new())
        .unwrap_err();
    assert!(err.to_string().contains("writing indented tree"));
}

// ============================================================================
// Lossy flattening
// ============================================================================

#[test]
fn test_flattening_reports_what_a_tree_cannot_hold() {
    init_tracing();
    let mut document = sample_document();
    let nl = &mut document.node_list;
    nl.add_node(Node::new_package("shared").with_name("shared"));
    nl.add_node(Node::new_package("loose").with_name("loose"));
    nl.add_edge(Edge::new("core", EdgeType::Contains, ["shared"]));
    nl.add_edge(Edge::new("util", EdgeType::Contains, ["shared", "core"]));

    let flat = nl.flatten_tree(&GraphConfig::default().traversal).unwrap();

    assert!(!flat.is_lossless());
    assert_eq!(flat.node_count(), 5);
    assert!(flat.degradations.contains(&Degradation::Cycle {
        parent: "util".to_string(),
        child: "core".to_string(),
    }));
    // util is visited first, so shared lands below it
    assert!(flat.degradations.contains(&Degradation::SharedChild {
        parent: "core".to_string(),
        child: "shared".to_string(),
    }));
    assert!(flat
        .degradations
        .contains(&Degradation::Unreachable { id: "loose".to_string() }));
}

#[test]
fn test_option_context_names_missing_root() {
    let document = sample_document();
    let err = document
        .get_root_nodes()
        .into_iter()
        .find(|n| n.name == "nope")
        .context_none("looking up root named nope")
        .unwrap_err();
    assert!(matches!(err, SbomGraphError::Validation(ref msg) if msg.contains("nope")));
}

#[test]
fn test_generator_ids_are_positional() {
    let mut first = NodeIdGenerator::new("tree");
    let mut second = NodeIdGenerator::new("tree");
    let a: Vec<String> = (0..3).map(|_| first.identifier(&["package", "auto"])).collect();
    let b: Vec<String> = (0..3).map(|_| second.identifier(&["package", "auto"])).collect();
    assert_eq!(a, b);
    assert_eq!(a[2], "tree-package-auto--3");
}
