use std::path::PathBuf;

use clap::Parser;

use crate::constants::{
    DEFAULT_BUCKET, DEFAULT_CONCURRENCY, DEFAULT_REGION, DEFAULT_SERVER_ADDR,
    MAX_AUTO_CONCURRENCY,
};

/// Command-line arguments for the treeput tool.
///
/// Credentials and the source directory are required; everything else has a
/// default suitable for a local MinIO instance. Missing required arguments
/// are rejected before any storage call is made.
#[derive(Parser, Debug)]
#[clap(name = "treeput", about = "Concurrent directory-tree uploader for S3-compatible object storage")]
pub struct Args {
    /// Access key id
    #[clap(long)]
    pub access_key: String,

    /// Secret key
    #[clap(long)]
    pub secret_key: String,

    /// Bucket name to upload into
    #[clap(short, long, default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    /// S3-compatible server to connect to
    #[clap(long, default_value = DEFAULT_SERVER_ADDR)]
    pub server_addr: String,

    /// Region to use
    #[clap(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Use TLS when talking to the server
    #[clap(long)]
    pub ssl: bool,

    /// Files under this directory are uploaded
    #[clap(short, long)]
    pub source_dir: PathBuf,

    /// Maximum concurrent transfers (0 sizes from the CPU count)
    #[clap(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Write a JSON run report to this path after the upload
    #[clap(long)]
    pub summary: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Concurrency to run with; 0 means auto-size from the CPU count, capped.
    pub fn effective_concurrency(&self) -> usize {
        if self.concurrency == 0 {
            std::cmp::min(num_cpus::get() * 2, MAX_AUTO_CONCURRENCY)
        } else {
            self.concurrency
        }
    }
}
