use crate::core::{ConfigProvider, ReportKind};
use crate::utils::error::{Result, StadiumError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportSection,
    pub input: InputSection,
    pub output: OutputSection,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub name: String,
    pub description: Option<String>,
    pub reports: Option<Vec<String>>,
    pub top_n: Option<usize>,
    pub top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSection {
    pub path: String,
    pub skip_invalid_rows: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    pub bundle: Option<bool>,
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string(), "json".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| StadiumError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        // 統一輸出格式為小寫
        for format in config.output.formats.iter_mut() {
            *format = format.trim().to_ascii_lowercase();
        }
        Ok(config)
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StadiumError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("report.name", &self.report.name)?;

        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_file_extension(
            "input.path",
            &self.input.path,
            validation::SUPPORTED_INPUT_EXTENSIONS,
        )?;
        validation::validate_path("output.path", &self.output.path)?;

        if let Some(top_n) = self.report.top_n {
            validation::validate_positive_number("report.top_n", top_n, 1)?;
        }
        if let Some(top_k) = self.report.top_k {
            validation::validate_positive_number("report.top_k", top_k, 1)?;
        }

        validation::validate_one_of(
            "output.formats",
            self.output_formats(),
            validation::SUPPORTED_OUTPUT_FORMATS,
        )?;

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_ref()) {
            validation::validate_one_of(
                "logging.format",
                std::slice::from_ref(format),
                validation::SUPPORTED_LOG_FORMATS,
            )?;
        }

        if let Some(reports) = &self.report.reports {
            if ReportKind::parse_list(reports)?.is_empty() {
                return Err(StadiumError::MissingConfigError {
                    field: "report.reports".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn log_format(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .unwrap_or("compact")
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn reports(&self) -> Vec<ReportKind> {
        match &self.report.reports {
            Some(reports) => ReportKind::parse_list(reports).unwrap_or_default(),
            None => ReportKind::ALL.to_vec(),
        }
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn top_n(&self) -> usize {
        self.report.top_n.unwrap_or(10)
    }

    fn top_k(&self) -> usize {
        self.report.top_k.unwrap_or(3)
    }

    fn bundle(&self) -> bool {
        self.output.bundle.unwrap_or(false)
    }

    fn skip_invalid_rows(&self) -> bool {
        self.input.skip_invalid_rows.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
