pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{engine::RankingEngine, etl::EtlEngine, pipeline::ReportPipeline};
pub use domain::model::StadiumRecord;
pub use domain::report::ReportKind;
pub use utils::error::{Result, StadiumError};
