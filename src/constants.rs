//! Global constants for the treeput application.

/// Default number of concurrent transfers when --concurrency is not given
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Path queue depth as a multiple of the transfer concurrency
pub const QUEUE_DEPTH_PER_SLOT: usize = 2;

/// Upper bound for auto-sized concurrency (--concurrency 0)
pub const MAX_AUTO_CONCURRENCY: usize = 32;

/// Default bucket name
pub const DEFAULT_BUCKET: &str = "mybucket";

/// Default S3-compatible server address
pub const DEFAULT_SERVER_ADDR: &str = "http://localhost:9000";

/// Default region name
pub const DEFAULT_REGION: &str = "us-east-1";
