//! Nodes: the packages and files of the graph.

use super::canonical::quote;
use super::{ExternalReference, ExternalReferenceType, HashAlgorithm, Person, Property, SoftwareIdentifierType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Whether a node describes a package or a single file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    #[default]
    Package,
    File,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package => write!(f, "PACKAGE"),
            Self::File => write!(f, "FILE"),
        }
    }
}

/// Primary purpose classification of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Purpose {
    #[default]
    Unknown,
    Application,
    Archive,
    Bom,
    Configuration,
    Container,
    Data,
    Device,
    DeviceDriver,
    Documentation,
    Evidence,
    Executable,
    File,
    Firmware,
    Framework,
    Install,
    Library,
    MachineLearningModel,
    Manifest,
    Model,
    Module,
    OperatingSystem,
    Other,
    Patch,
    Platform,
    Requirement,
    Source,
    Specification,
    Test,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unknown => "UNKNOWN",
            Self::Application => "APPLICATION",
            Self::Archive => "ARCHIVE",
            Self::Bom => "BOM",
            Self::Configuration => "CONFIGURATION",
            Self::Container => "CONTAINER",
            Self::Data => "DATA",
            Self::Device => "DEVICE",
            Self::DeviceDriver => "DEVICE_DRIVER",
            Self::Documentation => "DOCUMENTATION",
            Self::Evidence => "EVIDENCE",
            Self::Executable => "EXECUTABLE",
            Self::File => "FILE",
            Self::Firmware => "FIRMWARE",
            Self::Framework => "FRAMEWORK",
            Self::Install => "INSTALL",
            Self::Library => "LIBRARY",
            Self::MachineLearningModel => "MACHINE_LEARNING_MODEL",
            Self::Manifest => "MANIFEST",
            Self::Model => "MODEL",
            Self::Module => "MODULE",
            Self::OperatingSystem => "OPERATING_SYSTEM",
            Self::Other => "OTHER",
            Self::Patch => "PATCH",
            Self::Platform => "PLATFORM",
            Self::Requirement => "REQUIREMENT",
            Self::Source => "SOURCE",
            Self::Specification => "SPECIFICATION",
            Self::Test => "TEST",
        };
        f.write_str(label)
    }
}

/// A software package or file.
///
/// `id` is the graph key and is unique within a [`NodeList`](super::NodeList).
/// Equality compares the canonical flattened form, so the order of set-like
/// collections (licenses, suppliers, properties...) does not matter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    pub version: String,
    pub file_name: String,
    pub url_home: String,
    pub url_download: String,
    pub licenses: Vec<String>,
    pub license_concluded: String,
    pub license_comments: String,
    pub copyright: String,
    pub source_info: String,
    pub comment: String,
    pub summary: String,
    pub description: String,
    pub attribution: Vec<String>,
    pub suppliers: Vec<Person>,
    pub originators: Vec<Person>,
    pub release_date: Option<DateTime<Utc>>,
    pub build_date: Option<DateTime<Utc>>,
    pub valid_until_date: Option<DateTime<Utc>>,
    pub external_references: Vec<ExternalReference>,
    pub file_types: Vec<String>,
    pub primary_purpose: Vec<Purpose>,
    /// At most one digest per algorithm
    pub hashes: BTreeMap<HashAlgorithm, String>,
    pub identifiers: BTreeMap<SoftwareIdentifierType, String>,
    pub properties: Vec<Property>,
}

/// Overwrite `$dst` with `$src` when the incoming value is populated.
macro_rules! take_if_set {
    ($dst:expr, $src:expr, $empty:ident) => {
        if !$src.$empty() {
            $dst = $src.clone();
        }
    };
}

/// Fill `$dst` from `$src` only when `$dst` is still empty.
macro_rules! fill_if_empty {
    ($dst:expr, $src:expr, $empty:ident) => {
        if $dst.$empty() && !$src.$empty() {
            $dst = $src.clone();
        }
    };
}

impl Node {
    /// Create an empty package node
    pub fn new_package(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: NodeType::Package,
            ..Self::default()
        }
    }

    /// Create an empty file node
    pub fn new_file(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: NodeType::File,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn with_hash(mut self, algorithm: HashAlgorithm, digest: impl Into<String>) -> Self {
        self.add_hash(algorithm, digest);
        self
    }

    /// Attach a package URL as an external reference
    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.external_references.push(ExternalReference::purl(purl));
        self
    }

    /// Deep copy of the node
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub const fn is_file(&self) -> bool {
        matches!(self.node_type, NodeType::File)
    }

    /// Overwrite fields with every populated field of `other`.
    ///
    /// Empty strings, empty collections and unset dates in `other` leave the
    /// current value in place. `id` and `type` never change.
    pub fn update(&mut self, other: &Node) {
        take_if_set!(self.name, other.name, is_empty);
        take_if_set!(self.version, other.version, is_empty);
        take_if_set!(self.file_name, other.file_name, is_empty);
        take_if_set!(self.url_home, other.url_home, is_empty);
        take_if_set!(self.url_download, other.url_download, is_empty);
        take_if_set!(self.licenses, other.licenses, is_empty);
        take_if_set!(self.license_concluded, other.license_concluded, is_empty);
        take_if_set!(self.license_comments, other.license_comments, is_empty);
        take_if_set!(self.copyright, other.copyright, is_empty);
        take_if_set!(self.hashes, other.hashes, is_empty);
        take_if_set!(self.source_info, other.source_info, is_empty);
        take_if_set!(self.primary_purpose, other.primary_purpose, is_empty);
        take_if_set!(self.comment, other.comment, is_empty);
        take_if_set!(self.summary, other.summary, is_empty);
        take_if_set!(self.description, other.description, is_empty);
        take_if_set!(self.attribution, other.attribution, is_empty);
        take_if_set!(self.suppliers, other.suppliers, is_empty);
        take_if_set!(self.originators, other.originators, is_empty);
        take_if_set!(self.release_date, other.release_date, is_none);
        take_if_set!(self.build_date, other.build_date, is_none);
        take_if_set!(self.valid_until_date, other.valid_until_date, is_none);
        take_if_set!(self.external_references, other.external_references, is_empty);
        take_if_set!(self.identifiers, other.identifiers, is_empty);
        take_if_set!(self.file_types, other.file_types, is_empty);
        take_if_set!(self.properties, other.properties, is_empty);
    }

    /// Fill only the fields that are still empty with values from `other`.
    ///
    /// Populated fields are never overwritten.
    pub fn augment(&mut self, other: &Node) {
        fill_if_empty!(self.name, other.name, is_empty);
        fill_if_empty!(self.version, other.version, is_empty);
        fill_if_empty!(self.file_name, other.file_name, is_empty);
        fill_if_empty!(self.url_home, other.url_home, is_empty);
        fill_if_empty!(self.url_download, other.url_download, is_empty);
        fill_if_empty!(self.licenses, other.licenses, is_empty);
        fill_if_empty!(self.license_concluded, other.license_concluded, is_empty);
        fill_if_empty!(self.license_comments, other.license_comments, is_empty);
        fill_if_empty!(self.copyright, other.copyright, is_empty);
        fill_if_empty!(self.hashes, other.hashes, is_empty);
        fill_if_empty!(self.source_info, other.source_info, is_empty);
        fill_if_empty!(self.primary_purpose, other.primary_purpose, is_empty);
        fill_if_empty!(self.comment, other.comment, is_empty);
        fill_if_empty!(self.summary, other.summary, is_empty);
        fill_if_empty!(self.description, other.description, is_empty);
        fill_if_empty!(self.attribution, other.attribution, is_empty);
        fill_if_empty!(self.suppliers, other.suppliers, is_empty);
        fill_if_empty!(self.originators, other.originators, is_empty);
        fill_if_empty!(self.release_date, other.release_date, is_none);
        fill_if_empty!(self.build_date, other.build_date, is_none);
        fill_if_empty!(self.valid_until_date, other.valid_until_date, is_none);
        fill_if_empty!(self.external_references, other.external_references, is_empty);
        fill_if_empty!(self.identifiers, other.identifiers, is_empty);
        fill_if_empty!(self.file_types, other.file_types, is_empty);
        fill_if_empty!(self.properties, other.properties, is_empty);
    }

    /// Canonical string form of the node.
    ///
    /// One `field:value` pair per populated field with every free-text value
    /// quoted as a JSON string. Set-like collections are sorted, then all
    /// pairs are sorted and joined with `,`. Empty fields are omitted.
    #[must_use]
    pub fn flat_string(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();

        let scalars = [
            ("id", &self.id),
            ("name", &self.name),
            ("version", &self.version),
            ("file_name", &self.file_name),
            ("url_home", &self.url_home),
            ("url_download", &self.url_download),
            ("license_concluded", &self.license_concluded),
            ("license_comments", &self.license_comments),
            ("copyright", &self.copyright),
            ("source_info", &self.source_info),
            ("comment", &self.comment),
            ("summary", &self.summary),
            ("description", &self.description),
        ];
        for (field, value) in scalars {
            if !value.is_empty() {
                pairs.push(format!("{field}:{}", quote(value)));
            }
        }
        pairs.push(format!("type:{}", self.node_type));

        push_sorted_list(&mut pairs, "licenses", self.licenses.iter().cloned());
        push_sorted_list(&mut pairs, "attribution", self.attribution.iter().cloned());
        push_sorted_list(&mut pairs, "file_types", self.file_types.iter().cloned());
        push_sorted_list(
            &mut pairs,
            "primary_purpose",
            self.primary_purpose.iter().map(ToString::to_string),
        );

        let dates = [
            ("release_date", self.release_date),
            ("build_date", self.build_date),
            ("valid_until_date", self.valid_until_date),
        ];
        for (field, date) in dates {
            if let Some(date) = date {
                pairs.push(format!("{field}:{}", date.timestamp()));
            }
        }

        for (algo, digest) in &self.hashes {
            pairs.push(format!("hashes[{algo}]:{}", quote(digest)));
        }
        for (kind, value) in &self.identifiers {
            pairs.push(format!("identifiers[{kind}]:{}", quote(value)));
        }

        let nested = |label: &str, flat: String| format!("{label}:{}", quote(&flat));
        pairs.extend(self.suppliers.iter().map(|p| nested("supplier", p.flat_string())));
        pairs.extend(self.originators.iter().map(|p| nested("originator", p.flat_string())));
        pairs.extend(
            self.external_references
                .iter()
                .map(|e| nested("extref", e.flat_string())),
        );
        pairs.extend(self.properties.iter().map(|p| nested("property", p.flat_string())));

        pairs.sort();
        pairs.join(",")
    }

    /// SHA-256 hex digest of the canonical string
    #[must_use]
    pub fn checksum(&self) -> String {
        let digest = Sha256::digest(self.flat_string().as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Compare two nodes by their canonical form
    #[must_use]
    pub fn equal(&self, other: &Node) -> bool {
        self.flat_string() == other.flat_string()
    }

    /// The node's package URL.
    ///
    /// Files never have one. For packages this is the URL of the first
    /// external reference of kind `purl`, falling back to the purl entry of
    /// the identifier map.
    #[must_use]
    pub fn purl(&self) -> Option<&str> {
        if self.is_file() {
            return None;
        }
        self.external_references
            .iter()
            .find(|e| e.ref_type == ExternalReferenceType::Purl && !e.url.is_empty())
            .map(|e| e.url.as_str())
            .or_else(|| {
                self.identifiers
                    .get(&SoftwareIdentifierType::Purl)
                    .map(String::as_str)
                    .filter(|p| !p.is_empty())
            })
    }

    /// Ecosystem type of the node's purl (`npm`, `maven`, ...)
    #[must_use]
    pub fn purl_type(&self) -> Option<String> {
        self.purl().and_then(crate::matching::purl_type)
    }

    /// True when the node and `hashes` share at least one algorithm and agree
    /// on every algorithm they share.
    ///
    /// Algorithms only one side knows are ignored. Empty maps never match.
    #[must_use]
    pub fn hashes_match(&self, hashes: &BTreeMap<HashAlgorithm, String>) -> bool {
        if self.hashes.is_empty() || hashes.is_empty() {
            return false;
        }
        let mut matched = false;
        for (algo, digest) in hashes {
            match self.hashes.get(algo) {
                Some(own) if own == digest => matched = true,
                Some(_) => return false,
                None => {}
            }
        }
        matched
    }

    /// Set the digest for `algorithm`, replacing any previous one.
    ///
    /// Empty digests are ignored.
    pub fn add_hash(&mut self, algorithm: HashAlgorithm, digest: impl Into<String>) {
        let digest = digest.into();
        if digest.is_empty() {
            return;
        }
        self.hashes.insert(algorithm, digest);
    }

    /// Set the identifier of `kind`, replacing any previous one.
    ///
    /// Empty values are ignored.
    pub fn add_identifier(&mut self, kind: SoftwareIdentifierType, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.identifiers.insert(kind, value);
    }
}

fn push_sorted_list(pairs: &mut Vec<String>, field: &str, values: impl Iterator<Item = String>) {
    let mut values: Vec<String> = values.collect();
    values.sort();
    for (i, value) in values.iter().enumerate() {
        pairs.push(format!("{field}[{i}]:{}", quote(value)));
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Node {}
