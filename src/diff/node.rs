//! Field-by-field diff of two nodes.

use crate::model::{ExternalReference, Node, Person, Property};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Differences between two versions of a node.
///
/// `added` holds the values of the newer node that differ, `removed` the
/// values of the older node that were cleared or dropped. A scalar that
/// changed from one non-empty value to another appears only in `added`.
/// Both partial nodes carry the node id so they can be placed in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDiff {
    pub added: Node,
    pub removed: Node,
    /// Number of fields that differ
    pub diff_count: usize,
}

// ============================================================================
// Field comparators
// ============================================================================

/// Newer value if it changed or was set, older value if it was cleared.
fn diff_string(old: &str, new: &str) -> (String, String, usize) {
    if old == new {
        (String::new(), String::new(), 0)
    } else if new.is_empty() {
        (String::new(), old.to_string(), 1)
    } else {
        (new.to_string(), String::new(), 1)
    }
}

type DateDiff = (Option<DateTime<Utc>>, Option<DateTime<Utc>>, usize);

/// Same rule as [`diff_string`], compared at second precision.
fn diff_dates(old: Option<DateTime<Utc>>, new: Option<DateTime<Utc>>) -> DateDiff {
    match (old, new) {
        (Some(o), Some(n)) if o.timestamp() == n.timestamp() => (None, None, 0),
        (_, Some(n)) => (Some(n), None, 1),
        (Some(o), None) => (None, Some(o), 1),
        (None, None) => (None, None, 0),
    }
}

/// Set difference both ways, counted as one change.
fn diff_list<T: PartialEq + Clone>(old: &[T], new: &[T]) -> (Vec<T>, Vec<T>, usize) {
    let added: Vec<T> = new.iter().filter(|v| !old.contains(v)).cloned().collect();
    let removed: Vec<T> = old.iter().filter(|v| !new.contains(v)).cloned().collect();
    let count = usize::from(!added.is_empty() || !removed.is_empty());
    (added, removed, count)
}

/// Set difference keyed by a canonical string, counted as one change.
fn diff_keyed<T: Clone>(old: &[T], new: &[T], key: fn(&T) -> String) -> (Vec<T>, Vec<T>, usize) {
    let old_keys: HashSet<String> = old.iter().map(key).collect();
    let new_keys: HashSet<String> = new.iter().map(key).collect();
    let added: Vec<T> = new
        .iter()
        .filter(|v| !old_keys.contains(&key(v)))
        .cloned()
        .collect();
    let removed: Vec<T> = old
        .iter()
        .filter(|v| !new_keys.contains(&key(v)))
        .cloned()
        .collect();
    let count = usize::from(!added.is_empty() || !removed.is_empty());
    (added, removed, count)
}

type MapDiff<K> = (BTreeMap<K, String>, BTreeMap<K, String>, usize);

/// Key-wise map diff: new or changed keys are added, vanished keys removed.
fn diff_map<K: Ord + Clone>(old: &BTreeMap<K, String>, new: &BTreeMap<K, String>) -> MapDiff<K> {
    let added: BTreeMap<K, String> = new
        .iter()
        .filter(|(k, v)| old.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let removed: BTreeMap<K, String> = old
        .iter()
        .filter(|(k, _)| !new.contains_key(*k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let count = usize::from(!added.is_empty() || !removed.is_empty());
    (added, removed, count)
}

/// Apply a comparator to one field of both nodes and record the result.
macro_rules! diff_field {
    ($nd:ident, $field:ident, $cmp:expr) => {{
        let (added, removed, count) = $cmp;
        $nd.added.$field = added;
        $nd.removed.$field = removed;
        $nd.diff_count += count;
    }};
}

impl Node {
    /// Compare this node against a newer version of it.
    ///
    /// Returns `None` when no field differs.
    #[must_use]
    pub fn diff(&self, other: &Node) -> Option<NodeDiff> {
        let mut nd = NodeDiff {
            added: Node::default(),
            removed: Node::default(),
            diff_count: 0,
        };
        let (old, new) = (self, other);

        if old.id == new.id {
            nd.added.id.clone_from(&new.id);
            nd.removed.id.clone_from(&old.id);
        } else {
            diff_field!(nd, id, diff_string(&old.id, &new.id));
        }

        if old.node_type != new.node_type {
            nd.added.node_type = new.node_type;
            nd.removed.node_type = old.node_type;
            nd.diff_count += 1;
        }

        diff_field!(nd, name, diff_string(&old.name, &new.name));
        diff_field!(nd, version, diff_string(&old.version, &new.version));
        diff_field!(nd, file_name, diff_string(&old.file_name, &new.file_name));
        diff_field!(nd, url_home, diff_string(&old.url_home, &new.url_home));
        diff_field!(nd, url_download, diff_string(&old.url_download, &new.url_download));
        diff_field!(
            nd, license_concluded,
            diff_string(&old.license_concluded, &new.license_concluded)
        );
        diff_field!(
            nd, license_comments,
            diff_string(&old.license_comments, &new.license_comments)
        );
        diff_field!(nd, copyright, diff_string(&old.copyright, &new.copyright));
        diff_field!(nd, source_info, diff_string(&old.source_info, &new.source_info));
        diff_field!(nd, comment, diff_string(&old.comment, &new.comment));
        diff_field!(nd, summary, diff_string(&old.summary, &new.summary));
        diff_field!(nd, description, diff_string(&old.description, &new.description));

        diff_field!(nd, release_date, diff_dates(old.release_date, new.release_date));
        diff_field!(nd, build_date, diff_dates(old.build_date, new.build_date));
        diff_field!(
            nd, valid_until_date,
            diff_dates(old.valid_until_date, new.valid_until_date)
        );

        diff_field!(nd, licenses, diff_list(&old.licenses, &new.licenses));
        diff_field!(nd, attribution, diff_list(&old.attribution, &new.attribution));
        diff_field!(nd, file_types, diff_list(&old.file_types, &new.file_types));
        diff_field!(
            nd, primary_purpose,
            diff_list(&old.primary_purpose, &new.primary_purpose)
        );

        diff_field!(
            nd, suppliers,
            diff_keyed(&old.suppliers, &new.suppliers, Person::flat_string)
        );
        diff_field!(
            nd, originators,
            diff_keyed(&old.originators, &new.originators, Person::flat_string)
        );
        diff_field!(
            nd, external_references,
            diff_keyed(
                &old.external_references,
                &new.external_references,
                ExternalReference::flat_string
            )
        );
        diff_field!(
            nd, properties,
            diff_keyed(&old.properties, &new.properties, Property::flat_string)
        );

        diff_field!(nd, hashes, diff_map(&old.hashes, &new.hashes));
        diff_field!(nd, identifiers, diff_map(&old.identifiers, &new.identifiers));

        (nd.diff_count > 0).then_some(nd)
    }
}
