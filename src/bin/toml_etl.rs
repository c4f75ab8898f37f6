use answer_sheet_etl::core::pipeline::{collect_batch, EMPTY_BATCH_PROMPT};
use answer_sheet_etl::core::ConfigProvider;
use answer_sheet_etl::utils::error::ErrorSeverity;
use answer_sheet_etl::utils::{logger, validation::Validate};
use answer_sheet_etl::{EtlEngine, FormPipeline, LocalStorage, TomlConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Answer sheet extraction driven by a TOML job file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "answer-sheets.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// List the files that would be read without extracting anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(config.log_format(), args.verbose);
    tracing::info!("📁 Loaded job '{}' from {}", config.job.name, args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        let batch = collect_batch(config.input_paths())?;
        println!("Job: {}", config.job.name);
        println!("Output: {}/{}", config.output_path(), config.csv_filename());
        println!("Files ({}):", batch.len());
        for entry in &batch {
            println!("  {} ({})", entry.filename, entry.path.display());
        }
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = FormPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            if !summary.result.failed.is_empty() {
                eprintln!(
                    "⚠️ No form data could be extracted from: {}",
                    summary.result.failed.join(", ")
                );
            }
            match summary.output_path {
                Some(output_path) => println!("📁 Output saved to: {}", output_path),
                None => println!("{}", EMPTY_BATCH_PROMPT),
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
