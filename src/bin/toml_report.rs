use anyhow::Context;
use clap::Parser;
use stadium_rank::core::ConfigProvider;
use stadium_rank::utils::error::ErrorSeverity;
use stadium_rank::utils::{logger, validation::Validate};
use stadium_rank::{EtlEngine, LocalStorage, ReportPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Stadium ranking reports driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "stadium-report.toml")]
    config: String,

    /// Enable verbose output (overrides [logging].verbose)
    #[arg(short, long)]
    verbose: bool,

    /// Show what would be produced without reading or writing any data
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    logger::init_logger(config.log_format(), args.verbose || config.verbose());
    tracing::info!("Loaded configuration from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("DRY RUN MODE - no files will be read or written");
        return Ok(());
    }

    let pipeline = ReportPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Stadium reports generated");
            println!("📁 Output saved to: {}", output_path);
            Ok(())
        }
        Err(e) if e.severity() == ErrorSeverity::Low => {
            tracing::warn!("{}", e);
            println!("⚠️ {}", e.user_friendly_message());
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Report run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("💡 {}", e.recovery_suggestion());
            Err(e.into())
        }
    }
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!("  Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!(
        "  Reports: {}",
        config
            .reports()
            .iter()
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Top N: {}, Top K per region: {}", config.top_n(), config.top_k());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Bundle: {}", config.bundle());
    println!("  Skip invalid rows: {}", config.skip_invalid_rows());
    println!();
}
