use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ReportRunner<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting range report...");

        let phase = Instant::now();
        let analysis = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} results in {:?}",
            analysis.results.len(),
            phase.elapsed()
        );

        let phase = Instant::now();
        let report = self.pipeline.transform(analysis).await?;
        tracing::info!(
            "Evaluated {} results in {:?}",
            report.entries.len(),
            phase.elapsed()
        );

        let phase = Instant::now();
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report written to {} in {:?}", output_path, phase.elapsed());

        tracing::info!("📊 Total time: {:?}", started.elapsed());
        Ok(output_path)
    }
}
