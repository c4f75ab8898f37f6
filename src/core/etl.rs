use crate::core::{Pipeline, TransformResult};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// What a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// `None` when no file produced form data and no CSV was written.
    pub output_path: Option<String>,
    pub result: TransformResult,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let mut monitor = SystemMonitor::new(self.monitor_enabled);
        tracing::info!("Starting answer sheet extraction...");

        // Extract
        let batch = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} sheets, {} failed",
            batch.succeeded.len(),
            batch.failed.len()
        );
        monitor.finish_phase("extract");

        // Transform
        let result = self.pipeline.transform(batch).await?;
        tracing::info!(
            "Tabulated {} rows x {} columns",
            result.table.rows().len(),
            result.table.columns().len()
        );
        monitor.finish_phase("transform");

        // Load
        let output_path = self.pipeline.load(&result).await?;
        monitor.finish_phase("load");

        Ok(RunSummary {
            output_path,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BatchResult, ExtractionResult, FieldMap, Table};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records the order in which the engine drives each phase.
    #[derive(Default)]
    struct RecordingPipeline {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self) -> Result<BatchResult> {
            assert_eq!(self.calls.fetch_add(1, Ordering::SeqCst), 0);
            let mut fields = FieldMap::new();
            fields.insert("Math_1".to_string(), "3".to_string());
            Ok(BatchResult {
                succeeded: vec![ExtractionResult {
                    filename: "a.pdf".to_string(),
                    fields,
                }],
                failed: vec!["b.pdf".to_string()],
            })
        }

        async fn transform(&self, batch: BatchResult) -> Result<TransformResult> {
            assert_eq!(self.calls.fetch_add(1, Ordering::SeqCst), 1);
            let table = Table::from_results(&batch.succeeded);
            Ok(TransformResult {
                csv_output: table.to_csv()?,
                table,
                failed: batch.failed,
            })
        }

        async fn load(&self, _result: &TransformResult) -> Result<Option<String>> {
            assert_eq!(self.calls.fetch_add(1, Ordering::SeqCst), 2);
            Ok(Some("out/extracted_data.csv".to_string()))
        }
    }

    #[tokio::test]
    async fn test_run_drives_phases_in_order() {
        let engine = EtlEngine::new(RecordingPipeline::default());

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.output_path.as_deref(), Some("out/extracted_data.csv"));
        assert_eq!(summary.result.csv_output, "filename,Math_1\na.pdf,3\n");
        assert_eq!(summary.result.failed, vec!["b.pdf"]);
        assert_eq!(engine.pipeline.calls.load(Ordering::SeqCst), 3);
    }
}
