pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, ReportKind};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "stadium-rank")]
#[command(about = "Regional stadium ranking and capacity statistics")]
pub struct CliConfig {
    #[arg(short, long, help = "Stadium records file (.csv or .json)")]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "all")]
    pub reports: Vec<String>,

    #[arg(long, default_value = "10", help = "Number of stadiums in the global capacity ranking")]
    pub top_n: usize,

    #[arg(long, default_value = "3", help = "Region rank cut-off for the per-region ranking")]
    pub top_k: usize,

    #[arg(long, value_delimiter = ',', default_values = ["csv", "json"])]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle every output file into a single ZIP archive")]
    pub bundle: bool,

    #[arg(long, help = "Drop rows that fail cleaning instead of aborting")]
    pub skip_invalid_rows: bool,

    #[arg(long, default_value = "compact", help = "Log format: compact or json")]
    pub log_format: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn reports(&self) -> Vec<ReportKind> {
        // validate() 已確認清單可解析
        ReportKind::parse_list(&self.reports).unwrap_or_default()
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn top_n(&self) -> usize {
        self.top_n
    }

    fn top_k(&self) -> usize {
        self.top_k
    }

    fn bundle(&self) -> bool {
        self.bundle
    }

    fn skip_invalid_rows(&self) -> bool {
        self.skip_invalid_rows
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, validation::SUPPORTED_INPUT_EXTENSIONS)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("top_n", self.top_n, 1)?;
        validation::validate_positive_number("top_k", self.top_k, 1)?;
        validation::validate_one_of("formats", &self.formats, validation::SUPPORTED_OUTPUT_FORMATS)?;
        validation::validate_one_of(
            "log_format",
            std::slice::from_ref(&self.log_format),
            validation::SUPPORTED_LOG_FORMATS,
        )?;
        if ReportKind::parse_list(&self.reports)?.is_empty() {
            return Err(crate::utils::error::StadiumError::MissingConfigError {
                field: "reports".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_defaults() {
        let config = CliConfig::parse_from(["stadium-rank", "--input", "stadiums.csv"]);

        assert_eq!(config.top_n, 10);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.formats, vec!["csv", "json"]);
        assert_eq!(config.reports().len(), 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_validation_rejects_bad_values() {
        let config = CliConfig::parse_from(["stadium-rank", "-i", "stadiums.csv", "--top-n", "0"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["stadium-rank", "-i", "stadiums.xml"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["stadium-rank", "-i", "stadiums.csv", "--reports", "bogus"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["stadium-rank", "-i", "stadiums.csv", "--formats", "tsv"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_report_selection() {
        let config = CliConfig::parse_from([
            "stadium-rank",
            "-i",
            "stadiums.json",
            "--reports",
            "region-rank,closest-to-median",
        ]);
        assert_eq!(
            config.reports(),
            vec![ReportKind::RegionRank, ReportKind::ClosestToMedian]
        );
    }
}
