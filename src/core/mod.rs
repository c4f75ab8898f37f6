pub mod columns;
pub mod etl;
pub mod extractor;
pub mod pipeline;
pub mod table;
pub mod tabulator;

pub use crate::domain::model::{
    BatchEntry, BatchResult, ExtractionOutcome, ExtractionResult, FieldMap, FieldRecord,
    FieldValue, Table, TransformResult, FILENAME_COLUMN,
};
pub use crate::domain::ports::{ConfigProvider, FormReader, Pipeline, Storage};
pub use crate::utils::error::Result;
