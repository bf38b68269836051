use serde::Deserialize;
use serde_json::Value;

use crate::expression::LicenseSet;
use crate::models::{Coordinates, DefinitionSummary, DescribedInfo, FileSummary, LicensedInfo};

use super::{extract_date, Summarizer, SummaryError};

const TOOL: &str = "ScanCode";

/// Top-level basenames that identify a component's license file.
const LICENSE_FILE_NAMES: [&str; 4] = ["license", "license.txt", "license.md", "license.html"];

#[derive(Debug, Default, Deserialize)]
struct Harvest {
    #[serde(rename = "_metadata", default)]
    metadata: Metadata,
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(rename = "releaseDate")]
    release_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    /// Marker confirming the harvest came from the expected tool.
    scancode_version: Option<String>,
    #[serde(default)]
    files: Vec<ScanFile>,
}

/// One file entry from the raw scan output. Unknown fields are ignored;
/// missing sequences default to empty.
#[derive(Debug, Deserialize)]
struct ScanFile {
    path: String,
    #[serde(default)]
    licenses: Vec<LicenseDetection>,
    #[serde(default)]
    packages: Vec<PackageInfo>,
    #[serde(default)]
    copyrights: Vec<CopyrightRecord>,
}

#[derive(Debug, Deserialize)]
struct LicenseDetection {
    spdx_license_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PackageInfo {
    #[serde(default)]
    asserted_licenses: Vec<AssertedLicense>,
}

#[derive(Debug, Deserialize)]
struct AssertedLicense {
    license: Option<String>,
    spdx_license_key: Option<String>,
}

impl AssertedLicense {
    /// Manifests assert free text more reliably than a mapped key.
    fn value(&self) -> Option<&str> {
        self.license.as_deref().or(self.spdx_license_key.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct CopyrightRecord {
    #[serde(default)]
    statements: Vec<String>,
}

impl ScanFile {
    /// The first package entry's asserted licenses, if it has any.
    fn asserted_licenses(&self) -> Option<&[AssertedLicense]> {
        match self.packages.first() {
            Some(package) if !package.asserted_licenses.is_empty() => {
                Some(&package.asserted_licenses)
            }
            _ => None,
        }
    }
}

pub struct ScanCodeSummarizer {
    license_files: Vec<String>,
}

impl ScanCodeSummarizer {
    pub fn new() -> Self {
        Self {
            license_files: LICENSE_FILE_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Override the accepted license-file basenames (matched lower-cased).
    pub fn with_license_files(names: Vec<String>) -> Self {
        Self {
            license_files: names.iter().map(|name| name.to_lowercase()).collect(),
        }
    }

    /// License files are the highest-confidence signal. The first qualifying
    /// file in input order is the authority; later candidates never get a
    /// vote, even when this file's detections carry no usable keys.
    fn declared_from_license_file(&self, files: &[ScanFile]) -> Option<String> {
        let file = files.iter().find(|file| {
            let top_segment = file.path.split('/').next().unwrap_or_default().to_lowercase();
            self.license_files.contains(&top_segment) && !file.licenses.is_empty()
        })?;
        file.licenses
            .iter()
            .filter_map(|detection| detection.spdx_license_key.as_deref())
            .collect::<LicenseSet>()
            .to_expression()
    }
}

impl Default for ScanCodeSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Summarizer for ScanCodeSummarizer {
    fn summarize(
        &self,
        _coordinates: &Coordinates,
        harvested: &Value,
    ) -> Result<DefinitionSummary, SummaryError> {
        let harvest = Harvest::deserialize(harvested)
            .map_err(|_| SummaryError::InvalidHarvest { tool: TOOL })?;
        if harvest.content.scancode_version.as_deref().map_or(true, str::is_empty) {
            return Err(SummaryError::InvalidHarvest { tool: TOOL });
        }

        let files = &harvest.content.files;
        let declared = self
            .declared_from_license_file(files)
            .or_else(|| declared_from_package_info(files));

        Ok(DefinitionSummary {
            described: described_info(&harvest.metadata),
            licensed: declared.map(|declared| LicensedInfo { declared }),
            files: files.iter().map(summarize_file).collect(),
        })
    }
}

fn described_info(metadata: &Metadata) -> Option<DescribedInfo> {
    let release_date = metadata.release_date.as_deref().and_then(extract_date)?;
    Some(DescribedInfo {
        release_date: Some(release_date),
        ..Default::default()
    })
}

/// Package manifests are the second-best signal: the first file whose first
/// package entry asserts licenses decides, preferring asserted free text
/// over the mapped identifier key.
fn declared_from_package_info(files: &[ScanFile]) -> Option<String> {
    let asserted = files.iter().find_map(ScanFile::asserted_licenses)?;
    asserted
        .iter()
        .filter_map(AssertedLicense::value)
        .collect::<LicenseSet>()
        .to_expression()
}

/// Project one scanned file, independently of the component-level outcome.
fn summarize_file(file: &ScanFile) -> FileSummary {
    let license = match file.asserted_licenses() {
        Some(asserted) => asserted
            .iter()
            .filter_map(AssertedLicense::value)
            .collect::<LicenseSet>(),
        None => file
            .licenses
            .iter()
            .filter_map(|detection| detection.spdx_license_key.as_deref())
            .collect(),
    }
    .to_expression();

    let attributions: Vec<String> = file
        .copyrights
        .iter()
        .flat_map(|record| record.statements.iter().cloned())
        .collect();

    FileSummary {
        path: file.path.clone(),
        license,
        attributions: (!attributions.is_empty()).then_some(attributions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coordinates() -> Coordinates {
        Coordinates::new("npm/npmjs/-/test/1.0")
    }

    fn harvest(files: Value) -> Value {
        json!({
            "_metadata": { "releaseDate": "2018-03-06T11:38:10.284Z" },
            "content": { "scancode_version": "2.2.1", "files": files }
        })
    }

    fn summarize(harvested: &Value) -> DefinitionSummary {
        ScanCodeSummarizer::new()
            .summarize(&coordinates(), harvested)
            .unwrap()
    }

    #[test]
    fn test_missing_version_marker_is_invalid() {
        let no_marker = json!({
            "_metadata": {},
            "content": { "files": [] }
        });
        let result = ScanCodeSummarizer::new().summarize(&coordinates(), &no_marker);
        assert_eq!(result, Err(SummaryError::InvalidHarvest { tool: "ScanCode" }));

        let not_an_object = json!("scancode");
        let result = ScanCodeSummarizer::new().summarize(&coordinates(), &not_an_object);
        assert_eq!(result, Err(SummaryError::InvalidHarvest { tool: "ScanCode" }));
    }

    #[test]
    fn test_release_date_is_normalized_to_calendar_date() {
        let summary = summarize(&harvest(json!([])));
        assert_eq!(
            summary.described.unwrap().release_date,
            Some("2018-03-06".to_string())
        );
    }

    #[test]
    fn test_no_release_date_means_no_described_key() {
        let harvested = json!({
            "_metadata": {},
            "content": { "scancode_version": "2.2.1", "files": [] }
        });
        let summary = summarize(&harvested);
        assert_eq!(summary.described, None);

        let output = serde_json::to_value(&summary).unwrap();
        assert!(output.get("described").is_none());
    }

    #[test]
    fn test_license_file_is_the_authority() {
        let summary = summarize(&harvest(json!([
            {
                "path": "package.json",
                "packages": [{ "asserted_licenses": [{ "spdx_license_key": "Apache-2.0" }] }]
            },
            {
                "path": "LICENSE",
                "licenses": [{ "spdx_license_key": "MIT" }]
            }
        ])));
        assert_eq!(summary.licensed.unwrap().declared, "MIT");
    }

    #[test]
    fn test_license_file_basenames_match_any_case() {
        for path in ["LICENSE", "License.txt", "license.md", "LICENSE.HTML"] {
            let summary = summarize(&harvest(json!([
                { "path": path, "licenses": [{ "spdx_license_key": "MIT" }] }
            ])));
            assert_eq!(summary.licensed.unwrap().declared, "MIT", "path {path}");
        }
    }

    #[test]
    fn test_nested_license_file_does_not_qualify() {
        let summary = summarize(&harvest(json!([
            { "path": "src/LICENSE", "licenses": [{ "spdx_license_key": "MIT" }] }
        ])));
        assert_eq!(summary.licensed, None);
    }

    #[test]
    fn test_first_license_file_wins() {
        let summary = summarize(&harvest(json!([
            { "path": "LICENSE.txt", "licenses": [{ "spdx_license_key": "MIT" }] },
            { "path": "LICENSE.md", "licenses": [{ "spdx_license_key": "Apache-2.0" }] }
        ])));
        assert_eq!(summary.licensed.unwrap().declared, "MIT");
    }

    #[test]
    fn test_multiple_detections_join_in_insertion_order() {
        let summary = summarize(&harvest(json!([
            {
                "path": "LICENSE",
                "licenses": [
                    { "spdx_license_key": "MIT" },
                    { "spdx_license_key": "Apache-2.0" },
                    { "spdx_license_key": "MIT" }
                ]
            }
        ])));
        assert_eq!(summary.licensed.unwrap().declared, "MIT and Apache-2.0");
    }

    #[test]
    fn test_license_file_without_detections_falls_back_to_packages() {
        let summary = summarize(&harvest(json!([
            { "path": "LICENSE", "licenses": [] },
            {
                "path": "package.json",
                "packages": [{ "asserted_licenses": [
                    { "spdx_license_key": "MIT" },
                    { "spdx_license_key": "Apache-2.0" }
                ] }]
            }
        ])));
        assert_eq!(summary.licensed.unwrap().declared, "MIT and Apache-2.0");
    }

    #[test]
    fn test_first_package_assertion_wins() {
        let summary = summarize(&harvest(json!([
            { "path": "src/lib.rs" },
            {
                "path": "package.json",
                "packages": [{ "asserted_licenses": [{ "spdx_license_key": "MIT" }] }]
            },
            {
                "path": "vendor/package.json",
                "packages": [{ "asserted_licenses": [{ "spdx_license_key": "GPL-3.0" }] }]
            }
        ])));
        assert_eq!(summary.licensed.unwrap().declared, "MIT");
    }

    #[test]
    fn test_asserted_free_text_preferred_over_key() {
        let summary = summarize(&harvest(json!([
            {
                "path": "package.json",
                "packages": [{ "asserted_licenses": [
                    { "license": "Apache Software License", "spdx_license_key": "Apache-2.0" }
                ] }]
            }
        ])));
        assert_eq!(summary.licensed.unwrap().declared, "Apache Software License");
    }

    #[test]
    fn test_scattered_file_licenses_declare_nothing() {
        let summary = summarize(&harvest(json!([
            { "path": "src/a.rs", "licenses": [{ "spdx_license_key": "MIT" }] },
            { "path": "src/b.rs", "licenses": [{ "spdx_license_key": "GPL-3.0" }] }
        ])));
        assert_eq!(summary.licensed, None);
        assert_eq!(summary.files[0].license, Some("MIT".to_string()));
        assert_eq!(summary.files[1].license, Some("GPL-3.0".to_string()));
    }

    #[test]
    fn test_files_mirror_input_order_and_length() {
        let summary = summarize(&harvest(json!([
            { "path": "z.txt" },
            { "path": "a.txt" },
            { "path": "m/n.txt" }
        ])));
        let paths: Vec<&str> = summary.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["z.txt", "a.txt", "m/n.txt"]);
    }

    #[test]
    fn test_empty_file_projects_path_only() {
        let summary = summarize(&harvest(json!([
            { "path": "README.md", "licenses": [], "copyrights": [] }
        ])));
        let file = &summary.files[0];
        assert_eq!(file.license, None);
        assert_eq!(file.attributions, None);

        let output = serde_json::to_value(&summary).unwrap();
        assert_eq!(output["files"][0], json!({ "path": "README.md" }));
    }

    #[test]
    fn test_attributions_flatten_in_record_then_statement_order() {
        let summary = summarize(&harvest(json!([
            {
                "path": "src/lib.rs",
                "copyrights": [
                    { "statements": ["Copyright A"] },
                    { "statements": ["Copyright B", "Copyright C"] }
                ]
            }
        ])));
        assert_eq!(
            summary.files[0].attributions,
            Some(vec![
                "Copyright A".to_string(),
                "Copyright B".to_string(),
                "Copyright C".to_string()
            ])
        );
    }

    #[test]
    fn test_package_assertion_overrides_detections_per_file() {
        let summary = summarize(&harvest(json!([
            {
                "path": "package.json",
                "licenses": [{ "spdx_license_key": "GPL-3.0" }],
                "packages": [{ "asserted_licenses": [{ "license": "MIT" }] }]
            }
        ])));
        assert_eq!(summary.files[0].license, Some("MIT".to_string()));
    }

    #[test]
    fn test_custom_license_file_names() {
        let summarizer =
            ScanCodeSummarizer::with_license_files(vec!["COPYING".to_string()]);
        let harvested = harvest(json!([
            { "path": "COPYING", "licenses": [{ "spdx_license_key": "GPL-2.0" }] }
        ]));
        let summary = summarizer.summarize(&coordinates(), &harvested).unwrap();
        assert_eq!(summary.licensed.unwrap().declared, "GPL-2.0");
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let harvested = harvest(json!([
            {
                "path": "LICENSE",
                "licenses": [{ "spdx_license_key": "MIT" }],
                "copyrights": [{ "statements": ["Copyright A"] }]
            },
            { "path": "src/lib.rs" }
        ]));
        let first = summarize(&harvested);
        let second = summarize(&harvested);
        assert_eq!(first, second);
    }
}
