//! Configuration management.
//!
//! Settings come from a TOML file, overridden by `REFERENCE_FORMAT_*`
//! environment variables (nested keys separated by `__`), e.g.
//! `REFERENCE_FORMAT_CROSSREF__MAILTO=me@example.org`.
//!
//! ```toml
//! [crossref]
//! api_base = "https://api.crossref.org"
//! mailto = "me@example.org"
//! timeout_secs = 10
//!
//! [output]
//! author_style = "apa"
//! input_csv = "titles.csv"
//! output_csv = "apa_references.csv"
//! output_docx = "apa_references.docx"
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::AuthorStyle;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "reference-format.toml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "REFERENCE_FORMAT";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Metadata provider settings
    #[serde(default)]
    pub crossref: CrossRefConfig,

    /// Input/output settings
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// CrossRef API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossRefConfig {
    /// Base URL of the REST API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Contact address sent in the User-Agent (CrossRef "polite pool")
    #[serde(default)]
    pub mailto: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Candidates requested per title; only the first is used
    #[serde(default = "default_rows")]
    pub rows: u32,
}

impl Default for CrossRefConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            mailto: None,
            timeout_secs: default_timeout_secs(),
            rows: default_rows(),
        }
    }
}

fn default_api_base() -> String {
    crate::sources::CROSSREF_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_rows() -> u32 {
    1
}

/// Input/output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Author list policy shared by every export format
    #[serde(default)]
    pub author_style: AuthorStyle,

    #[serde(default = "default_input_csv")]
    pub input_csv: PathBuf,

    #[serde(default = "default_output_csv")]
    pub output_csv: PathBuf,

    #[serde(default = "default_output_docx")]
    pub output_docx: PathBuf,

    /// Column holding the titles in the input file
    #[serde(default = "default_title_column")]
    pub title_column: String,

    /// Column appended to the CSV output
    #[serde(default = "default_reference_column")]
    pub reference_column: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            author_style: AuthorStyle::default(),
            input_csv: default_input_csv(),
            output_csv: default_output_csv(),
            output_docx: default_output_docx(),
            title_column: default_title_column(),
            reference_column: default_reference_column(),
        }
    }
}

fn default_input_csv() -> PathBuf {
    PathBuf::from("titles.csv")
}

fn default_output_csv() -> PathBuf {
    PathBuf::from("apa_references.csv")
}

fn default_output_docx() -> PathBuf {
    PathBuf::from("apa_references.docx")
}

fn default_title_column() -> String {
    "Title".to_string()
}

fn default_reference_column() -> String {
    "APA Reference".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Find a configuration file in the default locations
///
/// Checks `./reference-format.toml` first, then
/// `{config_dir}/reference-format/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.toml"))
        .filter(|path| path.is_file())
}

impl Config {
    /// Write this configuration as TOML
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.crossref.api_base, "https://api.crossref.org");
        assert_eq!(config.crossref.timeout_secs, 10);
        assert_eq!(config.crossref.rows, 1);
        assert_eq!(config.output.author_style, AuthorStyle::Apa);
        assert_eq!(config.output.input_csv, PathBuf::from("titles.csv"));
        assert_eq!(config.output.output_docx, PathBuf::from("apa_references.docx"));
        assert_eq!(config.output.reference_column, "APA Reference");
    }

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[crossref]
mailto = "me@example.org"
timeout_secs = 3

[output]
author_style = "flat"
output_csv = "out/refs.csv"

[logging]
level = "debug"
"#;
        std::fs::write(&path, toml_content).unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.crossref.mailto.as_deref(), Some("me@example.org"));
        assert_eq!(config.crossref.timeout_secs, 3);
        assert_eq!(config.crossref.api_base, "https://api.crossref.org");
        assert_eq!(config.output.author_style, AuthorStyle::Flat);
        assert_eq!(config.output.output_csv, PathBuf::from("out/refs.csv"));
        assert_eq!(config.output.title_column, "Title");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.crossref.mailto = Some("saved@example.org".to_string());
        config.output.author_style = AuthorStyle::Flat;
        config.save(&path).unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.crossref.mailto.as_deref(), Some("saved@example.org"));
        assert_eq!(loaded.output.author_style, AuthorStyle::Flat);
    }

    #[test]
    fn test_env_override() {
        // rows is not read back from a file by any other test
        std::env::set_var("REFERENCE_FORMAT_CROSSREF__ROWS", "3");
        let config = load_config(None);
        std::env::remove_var("REFERENCE_FORMAT_CROSSREF__ROWS");

        let config = config.unwrap();
        assert_eq!(config.crossref.rows, 3);
        assert_eq!(config.crossref.api_base, "https://api.crossref.org");
    }

    #[test]
    fn test_config_file_nonexistent() {
        let result = load_config(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
