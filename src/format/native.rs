//! JSON encoding of the graph representation itself.

use super::{Serializer, Unserializer};
use crate::error::{ErrorContext, Result};
use crate::model::Document;
use std::io::{Read, Write};

/// Driver for [`Format::NATIVE_JSON`](super::Format::NATIVE_JSON): the
/// document's own serde representation, pretty-printed.
///
/// Useful for snapshots and for storage backends that want an opaque,
/// versioned encoding. The node list is normalized on read.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeJson;

impl Serializer for NativeJson {
    fn serialize(&self, document: &Document, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, document)
            .context("writing native JSON document")?;
        writer.flush()?;
        Ok(())
    }
}

impl Unserializer for NativeJson {
    fn unserialize(&self, reader: &mut dyn Read) -> Result<Document> {
        let mut document: Document =
            serde_json::from_reader(reader).context("reading native JSON document")?;
        document.node_list.normalize();
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, EdgeType, HashAlgorithm, Node, NodeList};

    #[test]
    fn test_native_round_trip_normalizes() {
        let nl = NodeList::new()
            .with_node(Node::new_package("app").with_hash(HashAlgorithm::Sha256, "aa"))
            .with_node(Node::new_file("main.rs"))
            .with_edge(Edge::new("app", EdgeType::Contains, ["main.rs", "ghost"]))
            .with_root("app");
        let mut doc = Document::new();
        doc.node_list = nl;

        let mut buf = Vec::new();
        NativeJson.serialize(&doc, &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains("\"contains\""));
        assert!(text.contains("\"SHA256\""));

        let read = NativeJson.unserialize(&mut buf.as_slice()).unwrap();
        assert_eq!(
            read.node_list.edges,
            vec![Edge::new("app", EdgeType::Contains, ["main.rs"])]
        );
        assert_eq!(read.node_list.len(), 2);
        assert_eq!(read.metadata, doc.metadata);
    }

    #[test]
    fn test_native_rekeys_nodes_by_id() {
        let metadata = serde_json::to_value(Document::new().metadata).unwrap();
        let text = serde_json::json!({
            "metadata": metadata,
            "node_list": {
                "nodes": {
                    "a": { "id": "b", "name": "first" },
                    "b": { "id": "b", "name": "second" },
                    "c": { "id": "c" }
                },
                "edges": [{ "type": "contains", "from": "b", "to": ["a", "c"] }],
                "root_elements": ["a", "b"]
            }
        })
        .to_string();

        let read = NativeJson.unserialize(&mut text.as_bytes()).unwrap();
        let nl = &read.node_list;

        assert_eq!(nl.len(), 2);
        assert!(nl.get_node_by_id("a").is_none());
        assert_eq!(nl.get_node_by_id("b").unwrap().name, "second");
        assert!(nl.nodes().all(|n| nl.get_node_by_id(&n.id).is_some_and(|m| m.id == n.id)));
        assert_eq!(nl.edges, vec![Edge::new("b", EdgeType::Contains, ["c"])]);
        assert_eq!(nl.root_elements, vec!["b"]);
    }

    #[test]
    fn test_native_rejects_garbage() {
        let err = NativeJson.unserialize(&mut "{ nope".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("reading native JSON document"));
    }
}
