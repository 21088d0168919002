use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::{error, info};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::constants::{DEFAULT_CONCURRENCY, QUEUE_DEPTH_PER_SLOT};
use crate::models::{RunSummary, TransferOutcome};
use crate::scanner;
use crate::sink::ObjectSink;
use crate::throttle::ThrottleGate;
use crate::transfer;

/// Tuning knobs for one pipeline run.
#[derive(Clone, Debug)]
pub struct UploadOptions {
    /// Maximum transfers in flight at once
    pub concurrency: usize,
    /// Capacity of the discovered-path queue; the scanner blocks when it is full
    pub queue_depth: usize,
}

impl UploadOptions {
    /// Options for the given concurrency, with the queue sized to keep the
    /// workers fed without letting a huge tree pile up in memory.
    pub fn new(concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        UploadOptions {
            concurrency,
            queue_depth: concurrency * QUEUE_DEPTH_PER_SLOT,
        }
    }
}

impl Default for UploadOptions {
    fn default() -> Self {
        UploadOptions::new(DEFAULT_CONCURRENCY)
    }
}

/// Upload every file under `source` to `sink`.
///
/// Runs one scanner pass feeding a bounded queue, and a throttled set of
/// transfer tasks consuming it. A slot is claimed from the gate *before* the
/// next path is taken off the queue, so admission is the suspension point and
/// a slow sink backs pressure all the way up into the scanner. Per-file
/// failures are folded into the summary and never halt the run.
///
/// Fatal errors (source missing or not a directory) are returned before the
/// scanner starts and before the sink is touched. Otherwise the call returns
/// only after every issued transfer has completed.
pub async fn run(
    sink: Arc<dyn ObjectSink>,
    source: &Path,
    options: &UploadOptions,
) -> Result<RunSummary> {
    let started = Instant::now();

    let metadata = tokio::fs::metadata(source)
        .await
        .with_context(|| format!("cannot read source directory {}", source.display()))?;
    if !metadata.is_dir() {
        bail!("source {} is not a directory", source.display());
    }

    info!(
        "uploading files from {} with up to {} concurrent transfers",
        source.display(),
        options.concurrency
    );

    let (paths_tx, mut paths_rx) = mpsc::channel::<PathBuf>(options.queue_depth.max(1));
    let root = source.to_path_buf();
    let scan = tokio::task::spawn_blocking(move || scanner::scan_tree(&root, &paths_tx));

    let gate = ThrottleGate::new(options.concurrency);
    let mut transfers: JoinSet<TransferOutcome> = JoinSet::new();
    let mut summary = RunSummary::default();
    let mut issued = 0u64;
    let mut completed = 0u64;
    let mut scanning = true;

    while scanning || !transfers.is_empty() {
        tokio::select! {
            received = paths_rx.recv(), if scanning => match received {
                Some(path) => {
                    let admission = gate.admit().await;
                    issued += 1;
                    let sink = Arc::clone(&sink);
                    transfers.spawn(async move {
                        // Held for the lifetime of the transfer; dropping it
                        // on completion is what frees the slot.
                        let _admission = admission;
                        transfer::transfer_file(sink, path).await
                    });
                }
                None => {
                    scanning = false;
                    if !transfers.is_empty() {
                        info!(
                            "discovery finished, draining {} in-flight transfers",
                            transfers.len()
                        );
                    }
                }
            },
            Some(joined) = transfers.join_next(), if !transfers.is_empty() => {
                completed += 1;
                match joined {
                    Ok(outcome) => summary.record(outcome),
                    Err(e) => error!("transfer task did not run to completion: {}", e),
                }
            }
        }
    }

    debug_assert_eq!(issued, completed);
    summary.attempted = issued;
    summary.discovered = scan.await.context("path scanner task panicked")?;
    summary.elapsed = started.elapsed();

    info!(
        "upload complete: {} discovered, {} uploaded, {} skipped, {} failed in {:.2?}",
        summary.discovered,
        summary.uploaded,
        summary.skipped,
        summary.failed(),
        summary.elapsed
    );
    Ok(summary)
}
