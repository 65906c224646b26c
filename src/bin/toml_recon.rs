use clap::Parser;
use tfa_recon::core::engine;
use tfa_recon::core::Pipeline;
use tfa_recon::domain::ports::ConfigProvider;
use tfa_recon::utils::{logger, validation::Validate};
use tfa_recon::{EtlError, LocalStorage, ReconEngine, TfaPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-recon")]
#[command(about = "TF annotation reconciliation driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "tfa-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the confidence score threshold from config
    #[arg(long)]
    score_threshold: Option<f64>,

    /// Dry run - reconcile and report stage counts without writing output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose, config.json_logs());
    tracing::info!("🚀 Starting TOML-based reconciliation: {}", config.run_name());
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Some(threshold) = args.score_threshold {
        config.set_score_threshold(threshold);
        tracing::info!("🔧 Score threshold overridden to: {}", threshold);
    }

    if let Err(e) = config.validate() {
        fail(e);
    }

    display_config_summary(&config);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let pipeline = TfaPipeline::new(LocalStorage::current_dir(), config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no output files will be written");
        if let Err(e) = perform_dry_run(&pipeline).await {
            fail(e);
        }
        return;
    }

    let engine = ReconEngine::new_with_monitoring(pipeline, monitor_enabled);
    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Reconciliation completed successfully!");
            println!("✅ Results written to {}", output_path);
        }
        Err(e) => fail(e),
    }
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("  Reference: {}", config.reference_path());
    tracing::info!("  Homology: {}", config.homology_path());
    tracing::info!("  Domain scan: {}", config.domain_scan_path());
    tracing::info!("  Predictions: {}", config.prediction_path());
    tracing::info!("  Score threshold: {}", config.score_threshold());
    tracing::info!("  Exclusion term: {}", config.exclusion_term());
    tracing::info!("  Output: {}/{}.*", config.output_dir(), config.output_prefix());
}

async fn perform_dry_run(pipeline: &TfaPipeline<LocalStorage, TomlConfig>) -> Result<(), EtlError> {
    let inputs = pipeline.extract().await?;
    let outcome = engine::run(&inputs, &pipeline.settings())?;

    println!("🔍 Dry run results:");
    for checkpoint in &outcome.filtered.checkpoints {
        println!("  After {}: {}", checkpoint.stage, checkpoint.remaining);
    }
    println!(
        "  Dropped rows - homology: {}, domain scan: {}, predictions: {}",
        outcome.dropped_rows.homology, outcome.dropped_rows.domain_scan, outcome.dropped_rows.predictions
    );
    Ok(())
}

fn fail(e: EtlError) -> ! {
    tracing::error!("❌ Stage '{}' failed: {}", e.stage(), e);
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}
