pub mod cleaning;
pub mod engine;
pub mod etl;
pub mod pipeline;
pub mod stats;

pub use crate::domain::model::{ReportResult, ReportTable, StadiumRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::domain::report::ReportKind;
pub use crate::utils::error::Result;
