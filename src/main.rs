use std::fs;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

mod cli;
mod constants;
mod models;
mod pipeline;
mod scanner;
mod sink;
mod summary;
mod throttle;
mod transfer;

use cli::Args;
use models::RunSummary;
use pipeline::UploadOptions;
use sink::s3::{S3Config, S3Sink};
use sink::ObjectSink;

fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.verbose)?;

    // Check the source before any storage call is made.
    let source_meta = fs::metadata(&args.source_dir).with_context(|| {
        format!("cannot read source directory {}", args.source_dir.display())
    })?;
    if !source_meta.is_dir() {
        bail!("source {} is not a directory", args.source_dir.display());
    }

    let runtime = Runtime::new().context("failed to create Tokio runtime")?;
    let summary = runtime.block_on(run_upload(&args))?;

    report_summary(&args, &summary)?;
    Ok(())
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("failed to initialize logger")?;
    Ok(())
}

/// Connect the sink and run the upload pipeline
async fn run_upload(args: &Args) -> Result<RunSummary> {
    let config = S3Config {
        access_key: args.access_key.clone(),
        secret_key: args.secret_key.clone(),
        bucket: args.bucket.clone(),
        server_addr: args.server_addr.clone(),
        region: args.region.clone(),
        use_ssl: args.ssl,
    };

    let sink: Arc<dyn ObjectSink> = Arc::new(
        S3Sink::connect(&config)
            .await
            .context("failed to set up storage sink")?,
    );

    let options = UploadOptions::new(args.effective_concurrency());
    pipeline::run(sink, &args.source_dir, &options).await
}

/// Log the final totals, every failure, and write the JSON report if asked
fn report_summary(args: &Args, summary: &RunSummary) -> Result<()> {
    info!(
        "files discovered: {}, transferred: {}, failed: {}, elapsed: {:.2?}",
        summary.discovered,
        summary.uploaded,
        summary.failed(),
        summary.elapsed
    );

    for failure in &summary.failures {
        warn!("failed: {}: {:#}", failure.path.display(), failure.error);
    }

    if let Some(path) = &args.summary {
        let report = summary::render_report(summary, &args.source_dir)?;
        fs::write(path, report)
            .with_context(|| format!("failed to write run report to {}", path.display()))?;
        info!("run report written to {}", path.display());
    }

    Ok(())
}
