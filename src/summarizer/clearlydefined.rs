use serde::Deserialize;
use serde_json::Value;

use crate::expression::LicenseSet;
use crate::models::{non_empty, Coordinates, DefinitionSummary, DescribedInfo, LicensedInfo};

use super::{extract_date, Summarizer, SummaryError};

const TOOL: &str = "ClearlyDefined";

/// Union of the ClearlyDefined harvest dialects. Which fields are present
/// depends on the component type; all are optional and this variant carries
/// no file list.
#[derive(Debug, Default, Deserialize)]
struct Harvest {
    #[serde(rename = "releaseDate")]
    release_date: Option<String>,
    #[serde(rename = "registryData", default)]
    registry_data: RegistryData,
    licenses: Option<Licenses>,
    #[serde(rename = "declaredLicense")]
    declared_license: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RegistryData {
    #[serde(rename = "releaseDate")]
    release_date: Option<String>,
    #[serde(default)]
    manifest: Manifest,
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    license: Option<LicenseField>,
    homepage: Option<String>,
    bugs: Option<BugsField>,
}

/// Manifest licenses appear as a bare string or as `{ "type": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LicenseField {
    Text(String),
    Object {
        #[serde(rename = "type")]
        kind: Option<String>,
    },
}

impl LicenseField {
    fn value(&self) -> Option<String> {
        match self {
            LicenseField::Text(text) => non_empty(Some(text.clone())),
            LicenseField::Object { kind } => non_empty(kind.clone()),
        }
    }
}

/// Gem-style license lists: a single string or an array of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Licenses {
    One(String),
    Many(Vec<String>),
}

impl Licenses {
    fn to_expression(&self) -> Option<String> {
        let set: LicenseSet = match self {
            Licenses::One(license) => std::iter::once(license.as_str()).collect(),
            Licenses::Many(list) => list.iter().map(String::as_str).collect(),
        };
        set.to_expression()
    }
}

/// npm `bugs` is either a tracker URL string or `{ url, email }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BugsField {
    Url(String),
    Tracker {
        url: Option<String>,
        email: Option<String>,
    },
}

impl BugsField {
    /// Bug trackers are URLs; a bare contact address is not a tracker.
    fn tracker(&self) -> Option<String> {
        match self {
            BugsField::Url(url) if url.starts_with("http") => Some(url.clone()),
            BugsField::Url(_) => None,
            BugsField::Tracker { url, email } => {
                non_empty(url.clone()).or_else(|| non_empty(email.clone()))
            }
        }
    }
}

pub struct ClearlyDefinedSummarizer;

impl ClearlyDefinedSummarizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClearlyDefinedSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Summarizer for ClearlyDefinedSummarizer {
    fn summarize(
        &self,
        _coordinates: &Coordinates,
        harvested: &Value,
    ) -> Result<DefinitionSummary, SummaryError> {
        let harvest = Harvest::deserialize(harvested)
            .map_err(|_| SummaryError::InvalidHarvest { tool: TOOL })?;

        Ok(DefinitionSummary {
            described: described_info(&harvest),
            licensed: declared_license(&harvest).map(|declared| LicensedInfo { declared }),
            files: Vec::new(),
        })
    }
}

fn described_info(harvest: &Harvest) -> Option<DescribedInfo> {
    let release_date = harvest
        .release_date
        .as_deref()
        .or(harvest.registry_data.release_date.as_deref())
        .and_then(extract_date);
    DescribedInfo {
        release_date,
        project_website: non_empty(harvest.registry_data.manifest.homepage.clone()),
        issue_tracker: harvest
            .registry_data
            .manifest
            .bugs
            .as_ref()
            .and_then(BugsField::tracker),
    }
    .into_field()
}

/// First non-empty of: manifest license, gem license list, declared license.
fn declared_license(harvest: &Harvest) -> Option<String> {
    if let Some(license) = harvest
        .registry_data
        .manifest
        .license
        .as_ref()
        .and_then(LicenseField::value)
    {
        return Some(license);
    }
    if let Some(expression) = harvest.licenses.as_ref().and_then(Licenses::to_expression) {
        return Some(expression);
    }
    non_empty(harvest.declared_license.clone())
}
