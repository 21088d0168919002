use anyhow::{Context, Result};
use bytes::BytesMut;
use futures::TryStreamExt;
use log::{debug, info};
use rusoto_core::{ByteStream, HttpClient, Region, RusotoError};
use rusoto_credential::StaticProvider;
use rusoto_s3::{CreateBucketError, CreateBucketRequest, PutObjectRequest, S3Client, S3};
use tokio_util::codec::{BytesCodec, FramedRead};

use crate::sink::{ObjectBody, ObjectSink};

/// Connection settings for an S3-compatible endpoint.
#[derive(Clone, Debug)]
pub struct S3Config {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub server_addr: String,
    pub region: String,
    pub use_ssl: bool,
}

/// Object sink backed by an S3-compatible service.
///
/// Bound to a single bucket. `connect` performs all one-time setup: static
/// credentials, custom endpoint, and bucket creation.
pub struct S3Sink {
    client: S3Client,
    bucket: String,
    endpoint: String,
}

impl S3Sink {
    /// Build a client from `config` and create the bucket, succeeding when
    /// the bucket already exists and is owned by the caller.
    pub async fn connect(config: &S3Config) -> Result<Self> {
        let endpoint = endpoint_url(&config.server_addr, config.use_ssl);
        let region = Region::Custom {
            name: config.region.clone(),
            endpoint: endpoint.clone(),
        };

        let credentials = StaticProvider::new_minimal(
            config.access_key.clone(),
            config.secret_key.clone(),
        );
        let http_client = HttpClient::new().context("failed to create HTTP client")?;
        let client = S3Client::new_with(http_client, credentials, region);
        debug!("S3 client created for {}", endpoint);

        let request = CreateBucketRequest {
            bucket: config.bucket.clone(),
            ..Default::default()
        };
        match client.create_bucket(request).await {
            Ok(_) => info!("created bucket {}", config.bucket),
            Err(RusotoError::Service(CreateBucketError::BucketAlreadyOwnedByYou(_))) => {
                info!("bucket {} already exists and is owned by you, continuing with it", config.bucket);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to create bucket {}", config.bucket));
            }
        }

        Ok(S3Sink {
            client,
            bucket: config.bucket.clone(),
            endpoint,
        })
    }

    fn object_location(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            key.trim_start_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl ObjectSink for S3Sink {
    async fn put(&self, key: &str, body: ObjectBody, content_length: u64) -> Result<String> {
        let stream = FramedRead::new(body, BytesCodec::new()).map_ok(BytesMut::freeze);
        let request = PutObjectRequest {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            body: Some(ByteStream::new_with_size(stream, content_length as usize)),
            content_length: Some(content_length as i64),
            ..Default::default()
        };

        self.client
            .put_object(request)
            .await
            .with_context(|| format!("failed to store object {} in bucket {}", key, self.bucket))?;

        Ok(self.object_location(key))
    }
}

/// Normalize a server address into an endpoint URL. An address that already
/// carries a scheme is used verbatim; otherwise the TLS flag picks one.
fn endpoint_url(server_addr: &str, use_ssl: bool) -> String {
    if server_addr.contains("://") {
        server_addr.to_string()
    } else if use_ssl {
        format!("https://{}", server_addr)
    } else {
        format!("http://{}", server_addr)
    }
}
