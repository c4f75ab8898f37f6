pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::app::session::{BatchKey, TableSession};
pub use crate::core::{
    etl::{EtlEngine, RunSummary},
    extractor::PdfFormExtractor,
    pipeline::FormPipeline,
    tabulator::{tabulate, BatchOutcome, BatchTabulator},
};
pub use crate::domain::model::{BatchEntry, BatchResult, ExtractionResult, FieldMap, Table};
pub use crate::utils::error::{EtlError, Result};
