use crate::core::columns::order_columns;
use crate::domain::model::{ExtractionResult, Table, FILENAME_COLUMN};
use crate::utils::error::{EtlError, Result};
use indexmap::IndexSet;

impl Table {
    /// One row per extraction, columns in canonical order. The synthetic
    /// `filename` cell wins over a form field of the same name.
    pub fn from_results(results: &[ExtractionResult]) -> Self {
        if results.is_empty() {
            return Table::empty();
        }

        let mut union: IndexSet<&str> = IndexSet::new();
        for result in results {
            union.extend(result.fields.keys().map(String::as_str));
        }
        union.insert(FILENAME_COLUMN);

        let mut columns: Vec<String> = union.into_iter().map(str::to_string).collect();
        order_columns(&mut columns);

        let rows = results
            .iter()
            .map(|result| {
                columns
                    .iter()
                    .map(|column| {
                        if column == FILENAME_COLUMN {
                            result.filename.clone()
                        } else {
                            result.fields.get(column).cloned().unwrap_or_default()
                        }
                    })
                    .collect()
            })
            .collect();

        Table { columns, rows }
    }

    pub fn to_csv(&self) -> Result<String> {
        if self.is_empty() {
            return Ok(String::new());
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| EtlError::ProcessingError {
                message: format!("Failed to flush CSV writer: {}", e),
            })?;
        String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
            message: format!("CSV output is not valid UTF-8: {}", e),
        })
    }

    /// Parses CSV produced by [`Table::to_csv`]; every cell is read back as
    /// a string.
    pub fn from_csv(content: &str) -> Result<Self> {
        if content.is_empty() {
            return Ok(Table::empty());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table { columns, rows })
    }
}
