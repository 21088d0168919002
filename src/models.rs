use std::path::PathBuf;
use std::time::Duration;

/// Result of one transfer attempt. Every path handed to a worker yields
/// exactly one of these; they are never retried or merged.
#[derive(Debug)]
pub enum TransferOutcome {
    /// Object stored; `location` is the sink-reported identifier.
    Uploaded { key: String, location: String },
    /// The path turned out to be a directory at transfer time and was skipped.
    SkippedDirectory { path: PathBuf },
    /// The transfer failed; `error` carries the underlying cause.
    Failed { path: PathBuf, error: anyhow::Error },
}

/// A single failed transfer, preserved for the final report.
#[derive(Debug)]
pub struct TransferFailure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

/// Aggregated counts for one pipeline run. Owned exclusively by the
/// orchestrator and finalized only after every issued transfer completed.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files emitted by the scanner
    pub discovered: u64,
    /// Transfers issued to workers
    pub attempted: u64,
    /// Objects stored successfully
    pub uploaded: u64,
    /// Paths skipped because they were directories at transfer time
    pub skipped: u64,
    /// Failed transfers with their original paths and errors
    pub failures: Vec<TransferFailure>,
    /// Wall time for the whole run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Number of transfers that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Fold one worker outcome into the totals.
    pub fn record(&mut self, outcome: TransferOutcome) {
        match outcome {
            TransferOutcome::Uploaded { key, location } => {
                log::debug!("stored {} at {}", key, location);
                self.uploaded += 1;
            }
            TransferOutcome::SkippedDirectory { path } => {
                log::debug!("skipped directory {}", path.display());
                self.skipped += 1;
            }
            TransferOutcome::Failed { path, error } => {
                log::warn!("failed to upload {}: {:#}", path.display(), error);
                self.failures.push(TransferFailure { path, error });
            }
        }
    }
}
