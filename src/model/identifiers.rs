//! Hash algorithms, software identifier kinds and synthetic node ids.
//!
//! Nodes carry two small maps keyed by the enums in this module: `hashes`
//! (one digest per [`HashAlgorithm`]) and `identifiers` (one value per
//! [`SoftwareIdentifierType`]). Nodes that arrive without a native id get a
//! synthetic one from [`NodeIdGenerator`]:
//!
//! ```text
//! protobom-<flag>[-<flag>...]--<slug>
//! ```
//!
//! The slug is either a sanitised free-text string or a running counter, so
//! ids are positional and not content-addressed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default prefix for synthetic node identifiers.
pub const DEFAULT_ID_PREFIX: &str = "protobom";

/// Slug value that asks the generator to use its counter.
const AUTO_SLUG: &str = "auto";

/// Hash algorithm types
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HashAlgorithm {
    #[default]
    Unknown,
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    #[serde(rename = "SHA3_256")]
    Sha3_256,
    #[serde(rename = "SHA3_384")]
    Sha3_384,
    #[serde(rename = "SHA3_512")]
    Sha3_512,
    #[serde(rename = "BLAKE2B_256")]
    Blake2b256,
    #[serde(rename = "BLAKE2B_384")]
    Blake2b384,
    #[serde(rename = "BLAKE2B_512")]
    Blake2b512,
    Blake3,
    Md2,
    #[serde(rename = "ADLER32")]
    Adler32,
    Md4,
    Md6,
    Sha224,
}

impl HashAlgorithm {
    /// All known algorithms, `Unknown` excluded.
    pub const ALL: [Self; 17] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Blake2b256,
        Self::Blake2b384,
        Self::Blake2b512,
        Self::Blake3,
        Self::Md2,
        Self::Adler32,
        Self::Md4,
        Self::Md6,
        Self::Sha224,
    ];

    /// Canonical label, also used as the algorithm half of hash index keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
            Self::Sha3_256 => "SHA3_256",
            Self::Sha3_384 => "SHA3_384",
            Self::Sha3_512 => "SHA3_512",
            Self::Blake2b256 => "BLAKE2B_256",
            Self::Blake2b384 => "BLAKE2B_384",
            Self::Blake2b512 => "BLAKE2B_512",
            Self::Blake3 => "BLAKE3",
            Self::Md2 => "MD2",
            Self::Adler32 => "ADLER32",
            Self::Md4 => "MD4",
            Self::Md6 => "MD6",
            Self::Sha224 => "SHA224",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = std::convert::Infallible;

    /// Parses canonical labels, tolerating `-` separators and lowercase
    /// (`sha-256`, `SHA3-256`, `blake2b-512`). Unrecognised names map to
    /// `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        let compact = normalized.replace('_', "");
        let found = Self::ALL.into_iter().find(|algo| {
            let label = algo.as_str();
            label == normalized || label.replace('_', "") == compact
        });
        Ok(found.unwrap_or_default())
    }
}

/// Kinds of software identifiers stored in a node's identifier map
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SoftwareIdentifierType {
    #[default]
    Unknown,
    Purl,
    Cpe22,
    Cpe23,
    Gitoid,
}

impl SoftwareIdentifierType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Purl => "purl",
            Self::Cpe22 => "cpe22",
            Self::Cpe23 => "cpe23",
            Self::Gitoid => "gitoid",
        }
    }
}

impl fmt::Display for SoftwareIdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoftwareIdentifierType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "purl" => Self::Purl,
            "cpe22" => Self::Cpe22,
            "cpe23" => Self::Cpe23,
            "gitoid" => Self::Gitoid,
            _ => Self::Unknown,
        })
    }
}

// ============================================================================
// Synthetic node identifiers
// ============================================================================

/// Build a synthetic node identifier from a prefix, flags and a slug.
///
/// The slug is lowercased and any character outside `[a-zA-Z0-9-.]` is
/// replaced with `-`. Flags are joined as given.
#[must_use]
pub fn node_identifier(prefix: &str, flags: &[&str], slug: &str) -> String {
    let mut id = String::from(prefix);
    for flag in flags {
        id.push('-');
        id.push_str(&sanitize_slug(flag));
    }
    id.push_str("--");
    id.push_str(&sanitize_slug(slug));
    id
}

/// Lowercase and replace characters not valid in node ids.
#[must_use]
pub fn sanitize_slug(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Per-document generator of synthetic node identifiers.
///
/// The counter only moves forward, so two runs over the same input in the same
/// order produce the same ids.
#[derive(Debug, Clone)]
pub struct NodeIdGenerator {
    prefix: String,
    counter: u64,
}

impl Default for NodeIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}

impl NodeIdGenerator {
    /// Create a generator for the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    /// Number of counter-based ids handed out so far
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.counter
    }

    /// Next counter-based id tagged with `flags`.
    pub fn next_id(&mut self, flags: &[&str]) -> String {
        self.counter += 1;
        node_identifier(&self.prefix, flags, &self.counter.to_string())
    }

    /// Id derived from free text, tagged with `flags`.
    #[must_use]
    pub fn id_for_name(&self, flags: &[&str], name: &str) -> String {
        node_identifier(&self.prefix, flags, name)
    }

    /// Id from a list of parts: every part but the last is a flag, the last is
    /// the slug. An empty list, or a last part of `auto`, uses the counter.
    pub fn identifier(&mut self, parts: &[&str]) -> String {
        match parts.split_last() {
            None => self.next_id(&[AUTO_SLUG]),
            Some((&slug, flags)) if slug == AUTO_SLUG || slug.is_empty() => {
                let mut flags = flags.to_vec();
                flags.push(AUTO_SLUG);
                self.next_id(&flags)
            }
            Some((&slug, flags)) => self.id_for_name(flags, slug),
        }
    }
}
