use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// 依序執行 extract → transform → load
pub struct ReconEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ReconEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting annotation reconciliation");

        let inputs = self.pipeline.extract().await?;
        tracing::info!(
            "📂 Read tables - reference: {} rows, homology: {} rows, domain scan: {} rows, predictions: {} rows",
            inputs.reference.len(),
            inputs.homology.len(),
            inputs.domain_scan.len(),
            inputs.predictions.len()
        );
        self.monitor.checkpoint("Extract");

        let outcome = self.pipeline.transform(inputs).await?;
        tracing::info!(
            "🧮 Reconciled {} sequences, {} passed all filters",
            outcome.merged.len(),
            outcome.filtered.rows.len()
        );
        self.monitor.checkpoint("Transform");

        let output_path = self.pipeline.load(outcome).await?;
        tracing::info!("💾 Results written to: {}", output_path);
        self.monitor.checkpoint("Load");
        self.monitor.finish();

        Ok(output_path)
    }
}
