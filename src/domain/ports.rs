use crate::domain::model::{BatchResult, ExtractionOutcome, FieldMap, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Removing a file that does not exist is not an error.
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Files or directories to read answer sheets from.
    fn input_paths(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn csv_filename(&self) -> &str;
    fn archive_enabled(&self) -> bool;
}

/// Reads the form fields of a single document. Implementations never fail:
/// problems are reported through [`ExtractionOutcome`].
pub trait FormReader: Send + Sync {
    fn inspect(&self, path: &Path) -> ExtractionOutcome;

    fn extract(&self, path: &Path) -> FieldMap {
        self.inspect(path).into_fields()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<BatchResult>;
    async fn transform(&self, batch: BatchResult) -> Result<TransformResult>;
    /// Returns the CSV location, or `None` when there was nothing to write.
    async fn load(&self, result: &TransformResult) -> Result<Option<String>>;
}
