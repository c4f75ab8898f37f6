use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Field name → display value, in the order fields were first seen.
pub type FieldMap = IndexMap<String, String>;

/// Name of the synthetic column carrying each row's source file.
pub const FILENAME_COLUMN: &str = "filename";

/// A form field value as stored in the PDF, before it is flattened to text.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Symbolic value of a checkbox or radio button (`/Yes`, `/Off`), kept
    /// without its leading `/` marker.
    NamedConstant(String),
    Text(String),
    Integer(i64),
    Real(f32),
    Boolean(bool),
    /// Multi-select list boxes store an array of choices.
    List(Vec<FieldValue>),
    Absent,
}

impl FieldValue {
    pub fn named(label: &str) -> Self {
        FieldValue::NamedConstant(label.strip_prefix('/').unwrap_or(label).to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::NamedConstant(label) => f.write_str(label),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(value) => write!(f, "{}", value),
            // 整數值的實數保留一位小數，避免與 Integer 混淆
            FieldValue::Real(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{:.1}", value)
            }
            FieldValue::Real(value) => write!(f, "{}", value),
            FieldValue::Boolean(value) => write!(f, "{}", value),
            FieldValue::List(values) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
            FieldValue::Absent => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    pub name: String,
    pub value: FieldValue,
}

/// What reading one document produced. Only [`ExtractionOutcome::Fields`]
/// with at least one entry counts as a success.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Fields(FieldMap),
    NoFormData,
    Unreadable(String),
}

impl ExtractionOutcome {
    pub fn into_fields(self) -> FieldMap {
        match self {
            ExtractionOutcome::Fields(fields) => fields,
            ExtractionOutcome::NoFormData | ExtractionOutcome::Unreadable(_) => FieldMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub filename: String,
    pub fields: FieldMap,
}

/// One uploaded file: the name the user knows it by and where it lives now.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchEntry {
    pub filename: String,
    pub path: PathBuf,
}

impl BatchEntry {
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
        }
    }

    /// Uses the final path component as the display filename.
    pub fn from_path(path: &Path) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self::new(filename, path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub succeeded: Vec<ExtractionResult>,
    pub failed: Vec<String>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Header plus rows; every row has exactly one cell per column and absent
/// fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl Table {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.rows.get(row).map(|cells| cells[index].as_str())
    }
}

/// Everything the collaborator needs after a batch: the table to show, the
/// CSV to offer for download and the files to warn about.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    pub table: Table,
    pub csv_output: String,
    pub failed: Vec<String>,
}
