pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_CSV_FILENAME: &str = "extracted_data.csv";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "answer-sheet-etl")]
#[command(about = "Extract fillable-form answers from PDF answer sheets into a CSV table")]
pub struct CliConfig {
    /// PDF files, or directories whose PDFs should be read
    #[arg(required = true)]
    pub inputs: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_CSV_FILENAME)]
    pub csv_filename: String,

    #[arg(long, help = "Also write a zip bundle with the CSV and failure report")]
    pub archive: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log per-phase timing and memory usage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_paths(&self) -> &[String] {
        &self.inputs
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn csv_filename(&self) -> &str {
        &self.csv_filename
    }

    fn archive_enabled(&self) -> bool {
        self.archive
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_input_paths("inputs", &self.inputs, &["pdf"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_filename("csv_filename", &self.csv_filename, "csv")?;
        Ok(())
    }
}
