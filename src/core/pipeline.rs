use crate::core::extractor::PdfFormExtractor;
use crate::core::tabulator::BatchTabulator;
use crate::core::{
    BatchEntry, BatchResult, ConfigProvider, FormReader, Pipeline, Storage, Table, TransformResult,
};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::{FileOptions, ZipWriter};

pub const FAILURE_REPORT: &str = "failed.json";
pub const ARCHIVE_NAME: &str = "answer_sheets.zip";
pub const EMPTY_BATCH_PROMPT: &str = "Please upload PDF answer sheet files.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    pub failed: Vec<String>,
}

/// Turns the configured inputs into a batch. Directories contribute their
/// `*.pdf` files sorted by name; anything else is passed through as-is and
/// left for the extractor to accept or reject.
pub fn collect_batch(inputs: &[String]) -> Result<Vec<BatchEntry>> {
    let mut batch = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if !path.is_dir() {
            batch.push(BatchEntry::from_path(path));
            continue;
        }

        let mut pdfs: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|candidate| candidate.is_file() && has_pdf_extension(candidate))
            .collect();
        pdfs.sort();
        tracing::debug!("Found {} PDFs in {}", pdfs.len(), path.display());

        batch.extend(pdfs.iter().map(|pdf| BatchEntry::from_path(pdf)));
    }

    Ok(batch)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

pub struct FormPipeline<S: Storage, C: ConfigProvider, R: FormReader = PdfFormExtractor> {
    storage: S,
    config: C,
    tabulator: BatchTabulator<R>,
}

impl<S: Storage, C: ConfigProvider> FormPipeline<S, C, PdfFormExtractor> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_reader(storage, config, PdfFormExtractor::new())
    }
}

impl<S: Storage, C: ConfigProvider, R: FormReader> FormPipeline<S, C, R> {
    pub fn with_reader(storage: S, config: C, reader: R) -> Self {
        Self {
            storage,
            config,
            tabulator: BatchTabulator::new(reader),
        }
    }

    fn build_archive(&self, csv_output: &str, report: Option<&[u8]>) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file::<_, ()>(self.config.csv_filename(), FileOptions::default())?;
        zip.write_all(csv_output.as_bytes())?;

        if let Some(report) = report {
            zip.start_file::<_, ()>(FAILURE_REPORT, FileOptions::default())?;
            zip.write_all(report)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, R: FormReader> Pipeline for FormPipeline<S, C, R> {
    async fn extract(&self) -> Result<BatchResult> {
        let batch = collect_batch(self.config.input_paths())?;
        tracing::info!("🚀 Extracting form data from {} files", batch.len());
        Ok(self.tabulator.extract_batch(&batch))
    }

    async fn transform(&self, batch: BatchResult) -> Result<TransformResult> {
        tracing::debug!(
            "Building table from {} extractions ({} failed)",
            batch.succeeded.len(),
            batch.failed.len()
        );
        let table = Table::from_results(&batch.succeeded);
        let csv_output = table.to_csv()?;

        Ok(TransformResult {
            table,
            csv_output,
            failed: batch.failed,
        })
    }

    async fn load(&self, result: &TransformResult) -> Result<Option<String>> {
        // 輸出目錄只反映這一批，先清掉上一批留下的檔案
        let report = if result.failed.is_empty() {
            self.storage.remove_file(FAILURE_REPORT).await?;
            None
        } else {
            let report = FailureReport {
                failed: result.failed.clone(),
            };
            let json = serde_json::to_vec_pretty(&report)?;
            self.storage.write_file(FAILURE_REPORT, &json).await?;
            tracing::debug!("Failure report written to {}", FAILURE_REPORT);
            Some(json)
        };

        let csv_filename = self.config.csv_filename();
        if result.table.is_empty() {
            self.storage.remove_file(csv_filename).await?;
            self.storage.remove_file(ARCHIVE_NAME).await?;
            tracing::warn!("📭 No form data in any input. {}", EMPTY_BATCH_PROMPT);
            return Ok(None);
        }

        self.storage
            .write_file(csv_filename, result.csv_output.as_bytes())
            .await?;

        if self.config.archive_enabled() {
            let zip_data = self.build_archive(&result.csv_output, report.as_deref())?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(ARCHIVE_NAME, &zip_data).await?;
        } else {
            self.storage.remove_file(ARCHIVE_NAME).await?;
        }

        let output_path = format!("{}/{}", self.config.output_path(), csv_filename);
        tracing::info!("💾 CSV saved: {}", output_path);
        Ok(Some(output_path))
    }
}
