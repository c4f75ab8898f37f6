//! Caller-side memoization of the last tabulated batch.
//!
//! The core stays a pure function of its batch; a host that re-renders on
//! every interaction keeps a [`TableSession`] and only pays for extraction
//! when the set of uploaded files actually changes.

use crate::core::extractor::PdfFormExtractor;
use crate::core::tabulator::{BatchOutcome, BatchTabulator};
use crate::core::{BatchEntry, FormReader};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Identity of a batch: filenames, paths and file contents, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchKey(String);

impl BatchKey {
    pub fn of(batch: &[BatchEntry]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((batch.len() as u64).to_le_bytes());

        for entry in batch {
            update_framed(&mut hasher, entry.filename.as_bytes());
            update_framed(&mut hasher, entry.path.to_string_lossy().as_bytes());
            match std::fs::read(&entry.path) {
                Ok(bytes) => {
                    hasher.update([1u8]);
                    update_framed(&mut hasher, &bytes);
                }
                // 讀不到的檔案也要有穩定的 key
                Err(_) => hasher.update([0u8]),
            }
        }

        BatchKey(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn update_framed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

pub struct TableSession<R: FormReader = PdfFormExtractor> {
    tabulator: BatchTabulator<R>,
    cached: Option<(BatchKey, Arc<BatchOutcome>)>,
}

impl TableSession<PdfFormExtractor> {
    pub fn new() -> Self {
        Self::with_reader(PdfFormExtractor::new())
    }
}

impl Default for TableSession<PdfFormExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FormReader> TableSession<R> {
    pub fn with_reader(reader: R) -> Self {
        Self {
            tabulator: BatchTabulator::new(reader),
            cached: None,
        }
    }

    /// Returns the cached outcome when `batch` is unchanged since the last
    /// call, otherwise tabulates it and replaces the cache.
    pub fn tabulate(&mut self, batch: &[BatchEntry]) -> Arc<BatchOutcome> {
        let key = BatchKey::of(batch);
        if let Some((cached_key, outcome)) = &self.cached {
            if *cached_key == key {
                tracing::debug!("Batch {} unchanged, reusing table", key.as_str());
                return Arc::clone(outcome);
            }
        }

        let outcome = Arc::new(self.tabulator.tabulate(batch));
        self.cached = Some((key, Arc::clone(&outcome)));
        outcome
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }
}
