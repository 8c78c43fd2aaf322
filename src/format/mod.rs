//! SBOM format identifiers and the driver contracts used by readers and
//! writers.
//!
//! Concrete wire formats live outside this crate. A driver implements
//! [`Serializer`] and/or [`Unserializer`] and is registered for a [`Format`]
//! in a [`FormatRegistry`] that the caller constructs and passes around.
//!
//! ```ignore
//! let mut registry = FormatRegistry::new();
//! registry.register_serializer(Format::CDX15_JSON, Box::new(MyCycloneDxWriter));
//! registry.write(&Format::CDX15_JSON, &document, &mut std::io::stdout())?;
//! ```

mod native;
mod registry;

pub use native::NativeJson;
pub use registry::FormatRegistry;

use crate::error::Result;
use crate::model::Document;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::io::{Read, Write};

/// Encoding label for JSON formats
pub const JSON: &str = "json";
/// Encoding label for text formats (tag-value)
pub const TEXT: &str = "text";
/// Kind label for SPDX formats
pub const SPDX: &str = "spdx";
/// Kind label for CycloneDX formats
pub const CYCLONEDX: &str = "cyclonedx";

const VERSION_MARKER: &str = ";version=";

/// An SBOM format as a media type with a version parameter,
/// e.g. `application/vnd.cyclonedx+json;version=1.5`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Format(Cow<'static, str>);

impl Format {
    pub const SPDX22_TV: Self = Self::from_static("text/spdx+text;version=2.2");
    pub const SPDX22_JSON: Self = Self::from_static("text/spdx+json;version=2.2");
    pub const SPDX23_TV: Self = Self::from_static("text/spdx+text;version=2.3");
    pub const SPDX23_JSON: Self = Self::from_static("text/spdx+json;version=2.3");
    pub const CDX10_JSON: Self = Self::from_static("application/vnd.cyclonedx+json;version=1.0");
    pub const CDX11_JSON: Self = Self::from_static("application/vnd.cyclonedx+json;version=1.1");
    pub const CDX12_JSON: Self = Self::from_static("application/vnd.cyclonedx+json;version=1.2");
    pub const CDX13_JSON: Self = Self::from_static("application/vnd.cyclonedx+json;version=1.3");
    pub const CDX14_JSON: Self = Self::from_static("application/vnd.cyclonedx+json;version=1.4");
    pub const CDX15_JSON: Self = Self::from_static("application/vnd.cyclonedx+json;version=1.5");
    /// serde encoding of the graph itself, see [`NativeJson`]
    pub const NATIVE_JSON: Self = Self::from_static("application/vnd.sbom-graph+json;version=1.0");

    /// Well-known SBOM formats
    pub const ALL: &'static [Self] = &[
        Self::SPDX22_TV,
        Self::SPDX22_JSON,
        Self::SPDX23_TV,
        Self::SPDX23_JSON,
        Self::CDX10_JSON,
        Self::CDX11_JSON,
        Self::CDX12_JSON,
        Self::CDX13_JSON,
        Self::CDX14_JSON,
        Self::CDX15_JSON,
    ];

    /// The empty format, rejected by registry lookups
    pub const EMPTY: Self = Self::from_static("");

    #[must_use]
    pub const fn from_static(media_type: &'static str) -> Self {
        Self(Cow::Borrowed(media_type))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of the `version` parameter, empty when absent
    #[must_use]
    pub fn version(&self) -> &str {
        self.0
            .split_once(VERSION_MARKER)
            .map_or("", |(_, version)| version)
    }

    fn version_parts(&self) -> Option<(&str, &str)> {
        let version = self.version();
        let (major, minor) = version.split_once('.')?;
        (!minor.contains('.')).then_some((major, minor))
    }

    /// Major version, empty unless the version is `<major>.<minor>`
    #[must_use]
    pub fn major(&self) -> &str {
        self.version_parts().map_or("", |(major, _)| major)
    }

    /// Minor version, empty unless the version is `<major>.<minor>`
    #[must_use]
    pub fn minor(&self) -> &str {
        self.version_parts().map_or("", |(_, minor)| minor)
    }

    /// [`JSON`], [`TEXT`] or empty
    #[must_use]
    pub fn encoding(&self) -> &'static str {
        if self.0.contains(JSON) {
            JSON
        } else if self.0.contains(TEXT) {
            TEXT
        } else {
            ""
        }
    }

    /// [`SPDX`], [`CYCLONEDX`] or empty
    #[must_use]
    pub fn kind(&self) -> &'static str {
        if self.0.contains(SPDX) {
            SPDX
        } else if self.0.contains(CYCLONEDX) {
            CYCLONEDX
        } else {
            ""
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Format {
    fn from(media_type: &str) -> Self {
        Self(Cow::Owned(media_type.to_string()))
    }
}

impl From<String> for Format {
    fn from(media_type: String) -> Self {
        Self(Cow::Owned(media_type))
    }
}

// ============================================================================
// Driver contracts
// ============================================================================

/// Writes a [`Document`] in one concrete format.
///
/// Implementations read the graph through the public `NodeList` API
/// (`get_root_nodes`, `node_descendants`, `flatten_tree`, edge enumeration)
/// and never modify it.
pub trait Serializer: Send + Sync {
    /// Encode `document` into `writer`.
    fn serialize(&self, document: &Document, writer: &mut dyn Write) -> Result<()>;
}

/// Reads a [`Document`] from one concrete format.
///
/// Implementations build the node list with `add_node`, `add_edge`,
/// `relate_node_list_at_id` and `add`, using
/// [`NodeIdGenerator`](crate::model::NodeIdGenerator) for nodes without a
/// native id.
pub trait Unserializer: Send + Sync {
    /// Decode a document from `reader`.
    fn unserialize(&self, reader: &mut dyn Read) -> Result<Document>;
}
