use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

/// Root configuration structure, deserialized from `.summarizr/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Declared-license resolver options.
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Report rendering options.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Options for the declared-license resolver.
#[derive(Debug, Default, Deserialize)]
pub struct ResolverConfig {
    /// Top-level basenames accepted as the component's license file
    /// (matched lower-cased). When absent, the canonical set applies:
    /// `license`, `license.txt`, `license.md`, `license.html`.
    #[serde(rename = "license-files")]
    pub license_files: Option<Vec<String>>,
}

/// How reports are rendered.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON reports.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `./.summarizr/config.toml`
/// 3. `~/.config/summarizr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let project_config = Path::new(".summarizr").join("config.toml");
    if project_config.exists() {
        let content = std::fs::read_to_string(&project_config)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("summarizr").join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.resolver.license_files, None);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_override_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            "[resolver]\nlicense-files = [\"license\", \"copying\"]\n\n[output]\npretty = false\n"
        )
        .unwrap();
        let config = load_config(Some(f.path())).unwrap();
        assert_eq!(
            config.resolver.license_files,
            Some(vec!["license".to_string(), "copying".to_string()])
        );
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[output]\npretty = false\n").unwrap();
        let config = load_config(Some(f.path())).unwrap();
        assert_eq!(config.resolver.license_files, None);
        assert!(!config.output.pretty);
    }
}
