use crate::core::extractor::PdfFormExtractor;
use crate::domain::model::{BatchEntry, BatchResult, ExtractionOutcome, ExtractionResult, Table};
use crate::domain::ports::FormReader;

/// The partitioned batch together with the table built from its successes.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub result: BatchResult,
    pub table: Table,
}

/// Runs a [`FormReader`] over a batch, one file at a time, in input order.
pub struct BatchTabulator<R: FormReader> {
    reader: R,
}

impl<R: FormReader> BatchTabulator<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Every entry lands in exactly one of `succeeded` / `failed`.
    pub fn extract_batch(&self, batch: &[BatchEntry]) -> BatchResult {
        let mut result = BatchResult::default();

        for entry in batch {
            tracing::info!("📄 Processing uploaded file: {}", entry.filename);
            match self.reader.inspect(&entry.path) {
                ExtractionOutcome::Fields(fields) if !fields.is_empty() => {
                    result.succeeded.push(ExtractionResult {
                        filename: entry.filename.clone(),
                        fields,
                    });
                }
                _ => {
                    tracing::warn!("No form data extracted from {}", entry.filename);
                    result.failed.push(entry.filename.clone());
                }
            }
        }

        tracing::info!(
            "📊 {} of {} files yielded form data",
            result.succeeded.len(),
            batch.len()
        );
        result
    }

    pub fn tabulate(&self, batch: &[BatchEntry]) -> BatchOutcome {
        let result = self.extract_batch(batch);
        let table = Table::from_results(&result.succeeded);
        BatchOutcome { result, table }
    }
}

impl Default for BatchTabulator<PdfFormExtractor> {
    fn default() -> Self {
        Self::new(PdfFormExtractor::new())
    }
}

/// Tabulates a batch of PDFs with the default `lopdf` reader.
pub fn tabulate(batch: &[BatchEntry]) -> BatchOutcome {
    BatchTabulator::<PdfFormExtractor>::default().tabulate(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FieldMap;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    /// Serves canned outcomes keyed by path.
    struct CannedReader {
        outcomes: HashMap<PathBuf, ExtractionOutcome>,
    }

    impl CannedReader {
        fn new(outcomes: Vec<(&str, ExtractionOutcome)>) -> Self {
            Self {
                outcomes: outcomes
                    .into_iter()
                    .map(|(path, outcome)| (PathBuf::from(path), outcome))
                    .collect(),
            }
        }
    }

    impl FormReader for CannedReader {
        fn inspect(&self, path: &Path) -> ExtractionOutcome {
            self.outcomes
                .get(path)
                .cloned()
                .unwrap_or_else(|| ExtractionOutcome::Unreadable("not found".to_string()))
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> ExtractionOutcome {
        ExtractionOutcome::Fields(
            pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect::<FieldMap>(),
        )
    }

    #[test]
    fn test_partition_is_total_and_ordered() {
        let reader = CannedReader::new(vec![
            ("/up/1", fields(&[("Math_1", "A")])),
            ("/up/2", ExtractionOutcome::NoFormData),
            ("/up/3", fields(&[("Math_1", "C")])),
            ("/up/4", ExtractionOutcome::Fields(FieldMap::new())),
        ]);
        let batch = vec![
            BatchEntry::new("one.pdf", "/up/1"),
            BatchEntry::new("two.pdf", "/up/2"),
            BatchEntry::new("three.pdf", "/up/3"),
            BatchEntry::new("four.pdf", "/up/4"),
            BatchEntry::new("five.pdf", "/up/5"),
        ];

        let result = BatchTabulator::new(reader).extract_batch(&batch);

        assert_eq!(result.total(), batch.len());
        let succeeded: Vec<&str> = result
            .succeeded
            .iter()
            .map(|r| r.filename.as_str())
            .collect();
        assert_eq!(succeeded, vec!["one.pdf", "three.pdf"]);
        assert_eq!(result.failed, vec!["two.pdf", "four.pdf", "five.pdf"]);
    }

    #[test]
    fn test_all_failures_give_empty_table() {
        let reader = CannedReader::new(vec![("/up/1", ExtractionOutcome::NoFormData)]);
        let outcome = BatchTabulator::new(reader).tabulate(&[BatchEntry::new("a.pdf", "/up/1")]);

        assert!(outcome.table.is_empty());
        assert_eq!(outcome.result.failed, vec!["a.pdf"]);
    }

    #[test]
    fn test_empty_batch() {
        let reader = CannedReader::new(vec![]);
        let outcome = BatchTabulator::new(reader).tabulate(&[]);
        assert_eq!(outcome.result.total(), 0);
        assert!(outcome.table.is_empty());
    }

    #[test]
    fn test_rows_follow_input_order() {
        let reader = CannedReader::new(vec![
            ("/up/b", fields(&[("Science_1", "T"), ("Math_10", "4")])),
            ("/up/a", fields(&[("Math_2", "1")])),
        ]);
        let batch = vec![
            BatchEntry::new("b.pdf", "/up/b"),
            BatchEntry::new("a.pdf", "/up/a"),
        ];

        let outcome = BatchTabulator::new(reader).tabulate(&batch);

        assert_eq!(
            outcome.table.columns(),
            ["filename", "Math_2", "Math_10", "Science_1"]
        );
        assert_eq!(outcome.table.rows()[0], vec!["b.pdf", "", "4", "T"]);
        assert_eq!(outcome.table.rows()[1], vec!["a.pdf", "1", "", ""]);
    }
}
