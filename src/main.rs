//! CoursePulse - AI-powered module feedback comparison
//!
//! A CLI tool that sends learner feedback from two teaching periods to
//! Gemini and renders a content-quality report from the structured answer.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any failure (arguments, unreadable input, analysis, writing the report)

mod analysis;
mod cli;
mod config;
mod intake;
mod llm;
mod models;
mod report;

use analysis::AnalysisController;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use intake::SelectedFile;
use llm::GeminiClient;
use models::Period;
use report::ReportMetadata;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("CoursePulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", redacted(&args));

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .coursepulse.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the model, output and report title.");
    Ok(())
}

/// Initialize logging based on verbosity settings. Logs go to stderr so a
/// report written to stdout stays clean.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Copy of the arguments that is safe to log.
fn redacted(args: &Args) -> Args {
    let mut args = args.clone();
    if args.api_key.is_some() {
        args.api_key = Some("<redacted>".to_string());
    }
    args
}

/// Run the complete workflow: intake, one analysis, report.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.apply_env_key(std::env::var("API_KEY").ok());
    config.merge_with_args(&args);
    config.validate()?;

    // Step 1: File intake
    let mut controller = AnalysisController::new(!args.quiet);
    for (period, path) in [(Period::First, &args.period1), (Period::Second, &args.period2)] {
        let path = path
            .as_deref()
            .with_context(|| format!("No feedback file given for {}", period))?;
        let file = SelectedFile::load(path)?;
        match file.record_count() {
            Some(rows) => info!("{}: {} ({} rows)", period, file.path.display(), rows),
            None => info!(
                "{}: {} (not parseable as CSV, sent as-is)",
                period,
                file.path.display()
            ),
        }
        controller.select(period, file);
    }

    // Handle --dry-run: show the prompt and exit
    if args.dry_run {
        return handle_dry_run(&controller);
    }

    // Step 2: One analysis call
    let client_config = config.client_config();
    if client_config.api_key.is_none() {
        warn!("No API key found; set GEMINI_API_KEY or pass --api-key");
    }

    if !args.quiet {
        eprintln!("🤖 Analyzing feedback with {}...", config.model.name);
    }

    match GeminiClient::new(client_config) {
        Ok(client) => {
            controller.run(&client).await;
        }
        Err(e) => controller.fail(e),
    }

    if let Some(message) = controller.error_message() {
        anyhow::bail!("{}", message);
    }
    let result = controller
        .result()
        .context("Analysis finished without a result")?;

    // Step 3: Render and write the report
    let session = controller.session();
    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        model_used: config.model.name.clone(),
        period1_file: session.label(Period::First).to_string(),
        period2_file: session.label(Period::Second).to_string(),
    };

    let output = report::render(result, &metadata, &config.render_options())?;

    match config.output_path() {
        Some(path) => {
            std::fs::write(&path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;

            if !args.quiet {
                eprintln!("\n📊 Analysis Summary:");
                for period in Period::ALL {
                    let s = &result.period(period).sentiment;
                    eprintln!(
                        "   {}: 👍 {:.1}% | 😐 {:.1}% | 👎 {:.1}%",
                        period, s.positive, s.neutral, s.negative
                    );
                }
                eprintln!("   Action points: {}", result.action_points.len());
                eprintln!("\n✅ Report saved to: {}", path.display());
            }
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Handle --dry-run: print the assembled prompt without calling the API.
fn handle_dry_run(controller: &AnalysisController) -> Result<()> {
    let request = controller
        .request()
        .context("Both feedback files are required")?;
    debug!("Controller state: {:?}", controller.state());

    eprintln!("\n🔍 Dry run: prompt that would be sent (no API call)...\n");
    println!("{}", request.prompt);

    let schema = serde_json::to_string_pretty(&request.schema)?;
    debug!("Response schema:\n{}", schema);

    eprintln!(
        "\n✅ Dry run complete. {} prompt bytes, no API calls were made.",
        request.prompt.len()
    );
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
