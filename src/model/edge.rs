//! Typed, multi-destination relationships between nodes.

use super::canonical::{quote, quote_list};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relationship kind carried by an [`Edge`]
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
#[serde(rename_all = "camelCase")]
pub enum EdgeType {
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
    Amends,
    Ancestor,
    BuildDependency,
    BuildTool,
    Contains,
    #[serde(rename = "contained_by")]
    ContainedBy,
    Copy,
    DataFile,
    DependencyManifest,
    DependsOn,
    DependencyOf,
    Descendant,
    Describes,
    DescribedBy,
    DevDependency,
    DevTool,
    DistributionArtifact,
    Documentation,
    DynamicLink,
    Example,
    ExpandedFromArchive,
    FileAdded,
    FileDeleted,
    FileModified,
    Generates,
    GeneratedFrom,
    Metafile,
    OptionalComponent,
    OptionalDependency,
    Other,
    Packages,
    Patch,
    Prerequisite,
    PrerequisiteFor,
    ProvidedDependency,
    RequirementFor,
    RuntimeDependency,
    SpecificationFor,
    StaticLink,
    Test,
    TestCase,
    TestDependency,
    TestTool,
    Variant,
}

impl EdgeType {
    /// Every edge type, in declaration order
    pub const ALL: [Self; 45] = [
        Self::Unknown,
        Self::Amends,
        Self::Ancestor,
        Self::BuildDependency,
        Self::BuildTool,
        Self::Contains,
        Self::ContainedBy,
        Self::Copy,
        Self::DataFile,
        Self::DependencyManifest,
        Self::DependsOn,
        Self::DependencyOf,
        Self::Descendant,
        Self::Describes,
        Self::DescribedBy,
        Self::DevDependency,
        Self::DevTool,
        Self::DistributionArtifact,
        Self::Documentation,
        Self::DynamicLink,
        Self::Example,
        Self::ExpandedFromArchive,
        Self::FileAdded,
        Self::FileDeleted,
        Self::FileModified,
        Self::Generates,
        Self::GeneratedFrom,
        Self::Metafile,
        Self::OptionalComponent,
        Self::OptionalDependency,
        Self::Other,
        Self::Packages,
        Self::Patch,
        Self::Prerequisite,
        Self::PrerequisiteFor,
        Self::ProvidedDependency,
        Self::RequirementFor,
        Self::RuntimeDependency,
        Self::SpecificationFor,
        Self::StaticLink,
        Self::Test,
        Self::TestCase,
        Self::TestDependency,
        Self::TestTool,
        Self::Variant,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Amends => "amends",
            Self::Ancestor => "ancestor",
            Self::BuildDependency => "buildDependency",
            Self::BuildTool => "buildTool",
            Self::Contains => "contains",
            Self::ContainedBy => "contained_by",
            Self::Copy => "copy",
            Self::DataFile => "dataFile",
            Self::DependencyManifest => "dependencyManifest",
            Self::DependsOn => "dependsOn",
            Self::DependencyOf => "dependencyOf",
            Self::Descendant => "descendant",
            Self::Describes => "describes",
            Self::DescribedBy => "describedBy",
            Self::DevDependency => "devDependency",
            Self::DevTool => "devTool",
            Self::DistributionArtifact => "distributionArtifact",
            Self::Documentation => "documentation",
            Self::DynamicLink => "dynamicLink",
            Self::Example => "example",
            Self::ExpandedFromArchive => "expandedFromArchive",
            Self::FileAdded => "fileAdded",
            Self::FileDeleted => "fileDeleted",
            Self::FileModified => "fileModified",
            Self::Generates => "generates",
            Self::GeneratedFrom => "generatedFrom",
            Self::Metafile => "metafile",
            Self::OptionalComponent => "optionalComponent",
            Self::OptionalDependency => "optionalDependency",
            Self::Other => "other",
            Self::Packages => "packages",
            Self::Patch => "patch",
            Self::Prerequisite => "prerequisite",
            Self::PrerequisiteFor => "prerequisiteFor",
            Self::ProvidedDependency => "providedDependency",
            Self::RequirementFor => "requirementFor",
            Self::RuntimeDependency => "runtimeDependency",
            Self::SpecificationFor => "specificationFor",
            Self::StaticLink => "staticLink",
            Self::Test => "test",
            Self::TestCase => "testCase",
            Self::TestDependency => "testDependency",
            Self::TestTool => "testTool",
            Self::Variant => "variant",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown edge type: {s}"))
    }
}

/// A typed relation from one node to a set of nodes.
///
/// `to` keeps insertion order but is treated as a set: duplicate destinations
/// are never added. The derived `PartialEq` is order-sensitive; use
/// [`Edge::equal`] or [`Edge::flat_string`] to compare destination sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub from: String,
    #[serde(default)]
    pub to: Vec<String>,
}

impl Edge {
    pub fn new<I, S>(from: impl Into<String>, edge_type: EdgeType, to: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut edge = Self {
            edge_type,
            from: from.into(),
            to: Vec::new(),
        };
        edge.add_destination_by_id(to);
        edge
    }

    /// Deep copy of the edge
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// True if `id` is one of the destinations
    #[must_use]
    pub fn points_to(&self, id: &str) -> bool {
        self.to.iter().any(|to| to == id)
    }

    /// Append destinations that are not already present.
    ///
    /// Returns the number of ids actually added.
    pub fn add_destination_by_id<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for id in ids {
            let id = id.into();
            if !self.points_to(&id) {
                self.to.push(id);
                added += 1;
            }
        }
        added
    }

    /// Canonical string: source, type and the sorted destinations.
    #[must_use]
    pub fn flat_string(&self) -> String {
        let mut to: Vec<&str> = self.to.iter().map(String::as_str).collect();
        to.sort_unstable();
        format!("{}:{}:{}", quote(&self.from), self.edge_type, quote_list(to))
    }

    /// Compare two edges ignoring destination order
    #[must_use]
    pub fn equal(&self, other: &Edge) -> bool {
        self.flat_string() == other.flat_string()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> [{}]", self.from, self.edge_type, self.to.join(", "))
    }
}
