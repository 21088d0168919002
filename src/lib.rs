//! # treeput
//!
//! Concurrent directory-tree uploader for S3-compatible object storage.
//!
//! ## Overview
//!
//! treeput walks a source directory, discovers every regular file, and
//! uploads each one to a bucket, keyed by its absolute path. A bounded queue
//! couples discovery to upload throughput and a counting-semaphore throttle
//! caps how many transfers are in flight at once. Per-file failures are
//! collected and reported at the end of the run instead of aborting it.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐    bounded     ┌──────────────────┐
//! │ PathScanner │───────────────▶│   Orchestrator   │
//! └─────────────┘   path queue   └────────┬─────────┘
//!                                         │ admit via ThrottleGate
//!                           ┌─────────────┼─────────────┐
//!                     ┌─────▼─────┐ ┌─────▼─────┐ ┌─────▼─────┐
//!                     │ transfer  │ │ transfer  │ │ transfer  │
//!                     └─────┬─────┘ └─────┬─────┘ └─────┬─────┘
//!                           └─────────────┼─────────────┘
//!                                   ┌─────▼─────┐
//!                                   │ ObjectSink│
//!                                   └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use treeput::pipeline::{self, UploadOptions};
//! use treeput::sink::s3::{S3Config, S3Sink};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = S3Config {
//!     access_key: "AKIATEST".to_string(),
//!     secret_key: "sekrit".to_string(),
//!     bucket: "mybucket".to_string(),
//!     server_addr: "http://localhost:9000".to_string(),
//!     region: "us-east-1".to_string(),
//!     use_ssl: false,
//! };
//!
//! let sink = Arc::new(S3Sink::connect(&config).await?);
//! let summary = pipeline::run(sink, Path::new("/data"), &UploadOptions::new(5)).await?;
//! println!("{} uploaded, {} failed", summary.uploaded, summary.failed());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Application-wide constants and defaults
pub mod constants;

/// Transfer outcomes and the run summary
pub mod models;

/// Directory traversal producing the paths to upload
pub mod scanner;

/// Storage sink trait and the S3 implementation
pub mod sink;

/// JSON run report rendering
pub mod summary;

/// Admission control for in-flight transfers
pub mod throttle;

/// Single-file transfer worker
pub mod transfer;

/// Pipeline orchestration: scanning, throttling, and completion tracking
pub mod pipeline;
