mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use audiomirror_core::{
    load_config, load_default_config, validate_config, BatchRunner, Config, Converter,
    FfmpegConverter,
};

use cli::{Cli, LogFormat, DEFAULT_CONFIG_FILE};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    let registry = tracing_subscriber::registry().with(filter);

    match cli.log_format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = load(cli)?;
    cli.apply(&mut config);

    validate_config(&config).context("Configuration validation failed")?;

    info!("Source: {}", config.paths.source_dir.display());
    info!("Output: {}", config.paths.output_dir.display());
    info!("Errors: {}", config.paths.error_dir.display());

    let converter = FfmpegConverter::new(config.converter.clone());
    info!(
        "Encoder: {} at {}",
        converter.config().ffmpeg_path.display(),
        converter.config().bitrate
    );
    if !config.dry_run {
        if let Err(e) = converter.validate().await {
            warn!("{}; every conversion will fail and be diverted", e);
        }
    }

    let mut runner = BatchRunner::new(config, converter);
    let summary = runner.run().await.context("Run aborted")?;

    if summary.dry_run {
        println!("Dry run, nothing was written.");
    }
    println!("{}", summary.counts);

    Ok(())
}

fn load(cli: &Cli) -> Result<Config> {
    if let Some(path) = &cli.config {
        info!("Loading configuration from {}", path.display());
        return load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        info!("Loading configuration from {}", default_path.display());
        return load_config(default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()));
    }

    load_default_config().context("Failed to load default configuration")
}
