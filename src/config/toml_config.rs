use crate::core::range::{Palette, ScaleConstants};
use crate::core::ConfigProvider;
use crate::domain::model::ReportSource;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{
    validate_formats, validate_non_empty_string, validate_path, validate_range, validate_url,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const OUTPUT_FORMATS: &[&str] = &["csv", "json"];

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
    #[serde(default)]
    pub scale: ScaleConstants,
    #[serde(default)]
    pub palette: Palette,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// http(s) endpoint or path to a JSON file
    pub endpoint: String,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub bundle: Option<BundleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub enabled: bool,
    pub filename: String,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("report.name", &self.report.name)?;

        match ReportSource::parse(&self.source.endpoint) {
            ReportSource::Http { url } => validate_url("source.endpoint", &url)?,
            ReportSource::File { .. } => validate_path("source.endpoint", &self.source.endpoint)?,
        }

        if let Some(token) = &self.source.token {
            if token.contains("${") {
                return Err(ReportError::InvalidConfigValueError {
                    field: "source.token".to_string(),
                    value: token.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validate_range("source.timeout_seconds", timeout, 1, 600)?;
        }

        validate_path("load.output_path", &self.load.output_path)?;
        validate_formats("load.output_formats", &self.load.output_formats, OUTPUT_FORMATS)?;

        if let Some(bundle) = &self.load.bundle {
            if bundle.enabled {
                validate_path("load.bundle.filename", &bundle.filename)?;
            }
        }

        self.scale.validate()?;

        for (field, swatch) in self.palette.swatches() {
            validate_non_empty_string(&format!("{}.background", field), &swatch.background)?;
            validate_non_empty_string(&format!("{}.marker", field), &swatch.marker)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn source(&self) -> ReportSource {
        ReportSource::parse(&self.source.endpoint)
    }

    fn access_token(&self) -> Option<&str> {
        self.source.token.as_deref().filter(|t| !t.is_empty())
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.source
            .headers
            .as_ref()
            .map(|h| h.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn bundle_filename(&self) -> Option<&str> {
        self.load
            .bundle
            .as_ref()
            .filter(|b| b.enabled)
            .map(|b| b.filename.as_str())
    }

    fn scale_constants(&self) -> ScaleConstants {
        self.scale
    }

    fn palette(&self) -> Palette {
        self.palette.clone()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[report]
name = "cbc-report"

[source]
endpoint = "https://portal.example/api/tests/12/test-data"
timeout_seconds = 30

[load]
output_path = "./reports"
output_formats = ["csv", "json"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.report.name, "cbc-report");
        assert!(config.source().is_remote());
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.scale_constants(), ScaleConstants::default());
        assert_eq!(config.palette(), Palette::default());
        assert!(config.bundle_filename().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scale_and_palette_overrides() {
        let content = format!(
            r#"{}
[load.bundle]
enabled = true
filename = "cbc.zip"

[scale]
high_headroom = 1.5
marker_max_percent = 95.0

[palette.normal]
background = "bg-emerald-500"
marker = "bg-emerald-700"
"#,
            BASIC
        );

        let config = TomlConfig::from_toml_str(&content).unwrap();
        let scale = config.scale_constants();
        assert_eq!(scale.high_headroom, 1.5);
        assert_eq!(scale.marker_max_percent, 95.0);
        assert_eq!(scale.low_pad_ratio, 0.5);
        let palette = config.palette();
        assert_eq!(palette.normal.background, "bg-emerald-500");
        assert_eq!(palette.normal.marker, "bg-emerald-700");
        assert_eq!(palette.caution.background, crate::core::range::palette::CAUTION);
        assert_eq!(config.bundle_filename(), Some("cbc.zip"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("VITA_RANGE_TEST_TOKEN", "token-from-env");

        let content = r#"
[report]
name = "env"

[source]
endpoint = "https://portal.example/api/tests/1/test-data"
token = "${VITA_RANGE_TEST_TOKEN}"

[load]
output_path = "./out"
output_formats = ["json"]
"#;

        let config = TomlConfig::from_toml_str(content).unwrap();
        assert_eq!(config.access_token(), Some("token-from-env"));

        std::env::remove_var("VITA_RANGE_TEST_TOKEN");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let content = r#"
[report]
name = "env"

[source]
endpoint = "https://portal.example/api/tests/1/test-data"
token = "${VITA_RANGE_DEFINITELY_UNSET}"

[load]
output_path = "./out"
output_formats = ["json"]
"#;

        let config = TomlConfig::from_toml_str(content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let content = BASIC.replace(r#"["csv", "json"]"#, r#"["xlsx"]"#);
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());

        let content = format!("{}\n[scale]\nmarker_min_percent = -1.0\n", BASIC);
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());

        let content = format!(
            "{}\n[palette.caution]\nbackground = \"bg-amber-400\"\nmarker = \"\"\n",
            BASIC
        );
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());

        // a swatch without its marker does not parse
        let content = format!("{}\n[palette.caution]\nbackground = \"bg-amber-400\"\n", BASIC);
        assert!(TomlConfig::from_toml_str(&content).is_err());
    }

    #[test]
    fn test_file_source() {
        let content = BASIC.replace(
            "https://portal.example/api/tests/12/test-data",
            "./fixtures/analysis.json",
        );
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert!(!config.source().is_remote());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report.name, "cbc-report");
    }
}
