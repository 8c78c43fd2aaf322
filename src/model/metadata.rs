//! Value types attached to nodes and documents.

use super::canonical::{quote, quote_list};
use super::HashAlgorithm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A person or organization (supplier, originator, author, contact).
///
/// `contacts` nests further persons. Cloning is a full deep copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    /// True when this entry describes an organization
    pub is_org: bool,
    pub email: String,
    pub url: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Person>,
}

impl Person {
    /// Create a person with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create an organization with just a name
    pub fn organization(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_org: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    #[must_use]
    pub fn with_contact(mut self, contact: Person) -> Self {
        self.contacts.push(contact);
        self
    }

    /// Canonical string used for equality and set difference.
    ///
    /// Contacts are flattened recursively and sorted, so contact order does
    /// not affect the result.
    #[must_use]
    pub fn flat_string(&self) -> String {
        let mut out = format!(
            "n({})o({})email({})url({})p({})",
            quote(&self.name),
            self.is_org,
            quote(&self.email),
            quote(&self.url),
            quote(&self.phone)
        );
        if !self.contacts.is_empty() {
            let mut contacts: Vec<String> = self.contacts.iter().map(Self::flat_string).collect();
            contacts.sort();
            out.push_str(&format!("c({})", quote_list(contacts)));
        }
        out
    }
}

/// An opaque (name, data) pair carrying format specific extension data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub data: String,
}

impl Property {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    #[must_use]
    pub fn flat_string(&self) -> String {
        format!("n({})d({})", quote(&self.name), quote(&self.data))
    }
}

/// External reference types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExternalReferenceType {
    #[default]
    Unknown,
    Attestation,
    Binary,
    Bom,
    Bower,
    BuildMeta,
    BuildSystem,
    CertificationReport,
    Chat,
    CodifiedInfrastructure,
    ComponentAnalysisReport,
    Configuration,
    DistributionIntake,
    Documentation,
    Download,
    DynamicAnalysisReport,
    Evidence,
    Formulation,
    IssueTracker,
    License,
    Log,
    MailingList,
    MaturityReport,
    MavenCentral,
    ModelCard,
    Npm,
    Nuget,
    Other,
    Poam,
    Purl,
    QualityMetrics,
    ReleaseNotes,
    RiskAssessment,
    RuntimeAnalysisReport,
    SecurityAdversaryModel,
    SecurityAdvisory,
    SecurityContact,
    SecurityFix,
    SecurityOther,
    SecurityPentestReport,
    SecuritySwid,
    SecurityThreatModel,
    Social,
    StaticAnalysisReport,
    Support,
    Vcs,
    VulnerabilityAssertion,
    VulnerabilityExploitabilityAssessment,
    Website,
}

impl fmt::Display for ExternalReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::Attestation => "attestation",
            Self::Binary => "binary",
            Self::Bom => "bom",
            Self::Bower => "bower",
            Self::BuildMeta => "build-meta",
            Self::BuildSystem => "build-system",
            Self::CertificationReport => "certification-report",
            Self::Chat => "chat",
            Self::CodifiedInfrastructure => "codified-infrastructure",
            Self::ComponentAnalysisReport => "component-analysis-report",
            Self::Configuration => "configuration",
            Self::DistributionIntake => "distribution-intake",
            Self::Documentation => "documentation",
            Self::Download => "download",
            Self::DynamicAnalysisReport => "dynamic-analysis-report",
            Self::Evidence => "evidence",
            Self::Formulation => "formulation",
            Self::IssueTracker => "issue-tracker",
            Self::License => "license",
            Self::Log => "log",
            Self::MailingList => "mailing-list",
            Self::MaturityReport => "maturity-report",
            Self::MavenCentral => "maven-central",
            Self::ModelCard => "model-card",
            Self::Npm => "npm",
            Self::Nuget => "nuget",
            Self::Other => "other",
            Self::Poam => "poam",
            Self::Purl => "purl",
            Self::QualityMetrics => "quality-metrics",
            Self::ReleaseNotes => "release-notes",
            Self::RiskAssessment => "risk-assessment",
            Self::RuntimeAnalysisReport => "runtime-analysis-report",
            Self::SecurityAdversaryModel => "security-adversary-model",
            Self::SecurityAdvisory => "security-advisory",
            Self::SecurityContact => "security-contact",
            Self::SecurityFix => "security-fix",
            Self::SecurityOther => "security-other",
            Self::SecurityPentestReport => "security-pentest-report",
            Self::SecuritySwid => "security-swid",
            Self::SecurityThreatModel => "security-threat-model",
            Self::Social => "social",
            Self::StaticAnalysisReport => "static-analysis-report",
            Self::Support => "support",
            Self::Vcs => "vcs",
            Self::VulnerabilityAssertion => "vulnerability-assertion",
            Self::VulnerabilityExploitabilityAssessment => {
                "vulnerability-exploitability-assessment"
            }
            Self::Website => "website",
        };
        f.write_str(label)
    }
}

/// A link from a node to an external resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    pub url: String,
    pub ref_type: ExternalReferenceType,
    pub comment: String,
    pub authority: String,
    /// Digests of the referenced content
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hashes: BTreeMap<HashAlgorithm, String>,
}

impl ExternalReference {
    pub fn new(ref_type: ExternalReferenceType, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ref_type,
            ..Self::default()
        }
    }

    /// Shorthand for a package URL reference
    pub fn purl(url: impl Into<String>) -> Self {
        Self::new(ExternalReferenceType::Purl, url)
    }

    #[must_use]
    pub fn flat_string(&self) -> String {
        let hashes: Vec<String> = self
            .hashes
            .iter()
            .map(|(algo, digest)| format!("{algo}:{digest}"))
            .collect();
        format!(
            "t({})u({})c({})a({})h({})",
            self.ref_type,
            quote(&self.url),
            quote(&self.comment),
            quote(&self.authority),
            quote_list(hashes)
        )
    }
}

/// A tool that took part in producing a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub version: String,
    pub vendor: String,
}

impl Tool {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            vendor: String::new(),
        }
    }
}

/// Lifecycle phase in which an SBOM was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentTypeKind {
    Other,
    Design,
    Source,
    Build,
    Analyzed,
    Deployed,
    Runtime,
    Discovery,
    Decommission,
}

/// Document type classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    pub kind: Option<DocumentTypeKind>,
    pub name: String,
    pub description: String,
}

impl DocumentType {
    #[must_use]
    pub fn of_kind(kind: DocumentTypeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }
}

/// Document-level metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document identity (serial number or namespace)
    pub id: String,
    pub version: String,
    pub name: String,
    pub comment: String,
    /// Creation timestamp
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub authors: Vec<Person>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    /// Lifecycle classifications, kept free of duplicates
    #[serde(default)]
    pub document_types: Vec<DocumentType>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            id: String::new(),
            version: "1".to_string(),
            name: String::new(),
            comment: String::new(),
            date: None,
            authors: Vec::new(),
            tools: Vec::new(),
            document_types: Vec::new(),
        }
    }
}

impl Metadata {
    /// Add a document type unless an equal one is already present.
    ///
    /// Returns true when the type was added.
    pub fn add_document_type(&mut self, document_type: DocumentType) -> bool {
        if self.document_types.contains(&document_type) {
            return false;
        }
        self.document_types.push(document_type);
        true
    }
}
