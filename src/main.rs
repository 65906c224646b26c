use clap::Parser;
use tfa_recon::utils::{logger, validation::Validate};
use tfa_recon::{CliConfig, LocalStorage, ReconEngine, TfaPipeline};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting tfa-recon");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let monitor_enabled = config.monitor;
    let pipeline = TfaPipeline::new(LocalStorage::current_dir(), config);
    let engine = ReconEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Reconciliation completed successfully!");
            println!("✅ Results written to {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Reconciliation failed at stage '{}': {} (Category: {:?}, Severity: {:?})",
                e.stage(),
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    }
}
