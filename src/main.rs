use answer_sheet_etl::core::pipeline::EMPTY_BATCH_PROMPT;
use answer_sheet_etl::utils::error::ErrorSeverity;
use answer_sheet_etl::utils::{logger, validation::Validate};
use answer_sheet_etl::{CliConfig, EtlEngine, FormPipeline, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting answer-sheet-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    let storage = LocalStorage::new(config.output_path.clone());
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
                Some(output_path) => {
                    println!(
                        "✅ Extracted {} answer sheets",
                        summary.result.table.rows().len()
                    );
                    println!("📁 Output saved to: {}", output_path);
                }
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
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

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
