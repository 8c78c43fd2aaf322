#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_graph::{NativeJson, TraversalConfig, Unserializer};

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the native JSON reader and the graph operations run on its output.
///
/// Inputs are also wrapped in a node list envelope so fuzzed node arrays
/// reach normalization, traversal and flattening.
fuzz_target!(|data: &[u8]| {
    let mut attempts = vec![data.to_vec()];
    if data.len() < MAX_WRAPPED_INPUT_LEN {
        if let Ok(s) = std::str::from_utf8(data) {
            attempts.push(
                format!(r#"{{"metadata":{{"id":"","version":"1","name":"","comment":"","date":null}},"node_list":{{"nodes":{{{s}}},"root_elements":["a"]}}}}"#)
                    .into_bytes(),
            );
        }
    }

    for bytes in attempts {
        let Ok(document) = NativeJson.unserialize(&mut bytes.as_slice()) else {
            continue;
        };
        let nl = &document.node_list;
        let _ = nl.flatten_tree(&TraversalConfig::default());
        for id in nl.root_elements.iter().take(4) {
            let _ = nl.node_graph(id);
            let _ = nl.node_descendants(id, 3);
        }
        let _ = nl.diff(&nl.union(nl));
    }
});
