use crate::domain::model::{ReportResult, StadiumRecord};
use crate::domain::report::ReportKind;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn reports(&self) -> Vec<ReportKind>;
    fn output_formats(&self) -> &[String];
    fn top_n(&self) -> usize;
    fn top_k(&self) -> usize;
    fn bundle(&self) -> bool;
    fn skip_invalid_rows(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<StadiumRecord>>;
    async fn transform(&self, records: Vec<StadiumRecord>) -> Result<ReportResult>;
    async fn load(&self, result: ReportResult) -> Result<String>;
}
