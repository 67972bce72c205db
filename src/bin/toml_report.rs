use clap::Parser;
use vita_range::config::toml_config::{BundleConfig, TomlConfig};
use vita_range::core::ConfigProvider;
use vita_range::utils::{logger, validation::Validate};
use vita_range::{LocalStorage, ReportPipeline, ReportRunner};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Range report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "report-config.toml")]
    config: String,

    #[arg(short, long)]
    verbose: bool,

    /// Write every output into this ZIP file, overriding the config
    #[arg(long)]
    bundle: Option<String>,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based range report");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(filename) = args.bundle.clone() {
        tracing::info!("🔧 Bundle overridden to: {}", filename);
        config.load.bundle = Some(BundleConfig {
            enabled: true,
            filename,
        });
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path());
    let pipeline = ReportPipeline::new(storage, config);
    let runner = ReportRunner::new(pipeline);

    match runner.run().await {
        Ok(output_path) => {
            println!("✅ Range report completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Range report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.source());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Data Source:");
    let source = config.source();
    println!("  Location: {}", source);
    println!("  Remote: {}", source.is_remote());
    if source.is_remote() {
        println!("  Bearer token: {}", config.access_token().is_some());
        println!("  Headers: {} custom headers", config.headers().len());
        if let Some(timeout) = config.request_timeout() {
            println!("  Timeout: {:?}", timeout);
        }
    }

    println!();
    println!("📏 Scale:");
    let scale = config.scale_constants();
    println!("  Low pad ratio: {}", scale.low_pad_ratio);
    println!("  Negative value headroom: {}", scale.negative_value_headroom);
    println!("  High headroom: {}", scale.high_headroom);
    println!("  Overflow pad ratio: {}", scale.overflow_pad_ratio);
    println!("  Default axis max: {}", scale.default_axis_max);
    println!(
        "  Marker clamp: {}% - {}%",
        scale.marker_min_percent, scale.marker_max_percent
    );

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    if let Some(bundle) = config.bundle_filename() {
        println!("  Bundle: {} (ZIP)", bundle);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
