use crate::config::DEFAULT_CSV_FILENAME;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// PDF files or directories of PDFs.
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub csv_filename: Option<String>,
    pub archive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    /// `"json"` or `"compact"` (default).
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHEETS_DIR})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_format(&self) -> Option<&str> {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_paths(&self) -> &[String] {
        &self.source.paths
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn csv_filename(&self) -> &str {
        self.load
            .csv_filename
            .as_deref()
            .unwrap_or(DEFAULT_CSV_FILENAME)
    }

    fn archive_enabled(&self) -> bool {
        self.load.archive.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_input_paths("source.paths", &self.source.paths, &["pdf"])?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_filename("load.csv_filename", self.csv_filename(), "csv")?;

        if let Some(format) = self.log_format() {
            if !["json", "compact"].contains(&format) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: json, compact".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[job]
name = "midterm"
description = "Midterm answer sheets"

[source]
paths = ["./uploads", "./late/sheet_12.pdf"]

[load]
output_path = "./results"
archive = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.job.name, "midterm");
        assert_eq!(config.input_paths(), ["./uploads", "./late/sheet_12.pdf"]);
        assert_eq!(config.csv_filename(), "extracted_data.csv");
        assert!(config.archive_enabled());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ANSWER_SHEET_TEST_DIR", "/srv/uploads");

        let toml_content = r#"
[job]
name = "env"

[source]
paths = ["${ANSWER_SHEET_TEST_DIR}/a.pdf", "${ANSWER_SHEET_UNSET_VAR}"]

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.paths[0], "/srv/uploads/a.pdf");
        assert_eq!(config.source.paths[1], "${ANSWER_SHEET_UNSET_VAR}");

        std::env::remove_var("ANSWER_SHEET_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[job]
name = "bad"

[source]
paths = ["answers.docx"]

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let toml_content = r#"
[job]
name = "logs"

[source]
paths = ["a.pdf"]

[load]
output_path = "./output"

[monitoring]
enabled = true
log_format = "xml"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let err = TomlConfig::from_toml_str("[job]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[job]
name = "file-test"

[source]
paths = ["sheet.pdf"]

[load]
output_path = "./output"
csv_filename = "scores.csv"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "file-test");
        assert_eq!(config.csv_filename(), "scores.csv");
        assert!(config.validate().is_ok());
    }
}
