use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of the component being summarized.
///
/// Never parsed or interpreted here; it is carried through so callers can
/// label the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates(pub String);

impl Coordinates {
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical summary of one component as reported by one tool.
///
/// Absent optional fields are omitted from the serialized output entirely —
/// never emitted as `null`, an empty string, or an empty object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub described: Option<DescribedInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub licensed: Option<LicensedInfo>,
    /// One entry per scanned file, in input order.
    #[serde(default)]
    pub files: Vec<FileSummary>,
}

/// Descriptive metadata about the component release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribedInfo {
    /// Date-only ISO form, e.g. `2018-03-06`.
    #[serde(rename = "releaseDate", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(rename = "projectWebsite", skip_serializing_if = "Option::is_none")]
    pub project_website: Option<String>,
    #[serde(rename = "issueTracker", skip_serializing_if = "Option::is_none")]
    pub issue_tracker: Option<String>,
}

impl DescribedInfo {
    pub fn is_empty(&self) -> bool {
        self.release_date.is_none() && self.project_website.is_none() && self.issue_tracker.is_none()
    }

    /// `None` unless at least one field is set, so an empty `described`
    /// never reaches the output.
    pub fn into_field(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Component-level license conclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicensedInfo {
    pub declared: String,
}

/// License and attribution facts for a single scanned file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributions: Option<Vec<String>>,
}

/// Drop empty strings so optional output fields are omitted rather than
/// serialized as `""`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
