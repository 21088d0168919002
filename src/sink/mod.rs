//! Storage sink abstraction.
//!
//! The pipeline writes objects through [`ObjectSink`] and nothing else; which
//! service sits behind it, how the bucket was created, and how credentials
//! were configured are the sink's setup concerns. [`s3::S3Sink`] is the
//! S3-compatible implementation.

use std::pin::Pin;

use anyhow::Result;
use tokio::io::AsyncRead;

/// S3-compatible object storage implementation
pub mod s3;

/// Streamed object contents handed to a sink.
pub type ObjectBody = Pin<Box<dyn AsyncRead + Send + Sync + 'static>>;

/// A write target for objects.
///
/// One operation: store `body` under `key` and return the sink-reported
/// location identifier. A call either stores the whole object or fails; the
/// pipeline does not clean up partial writes.
#[async_trait::async_trait]
pub trait ObjectSink: Send + Sync {
    async fn put(&self, key: &str, body: ObjectBody, content_length: u64) -> Result<String>;
}
