use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Drives a pipeline through extract, transform and load.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting stadium report run");

        // Extract
        let records = self.pipeline.extract().await?;
        tracing::info!("Loaded {} stadium records", records.len());

        // Transform
        let result = self.pipeline.transform(records).await?;
        tracing::info!(
            "Built {} reports ({} rows total)",
            result.tables.len(),
            result.tables.iter().map(|t| t.row_count).sum::<usize>()
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "Report run finished in {:?}, output saved to: {}",
            started.elapsed(),
            output_path
        );

        Ok(output_path)
    }
}
