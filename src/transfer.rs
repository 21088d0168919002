use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use tokio::fs::File;

use crate::models::TransferOutcome;
use crate::sink::ObjectSink;

/// Derive the storage key for a file.
///
/// The key is the absolute path itself, which is unique across the tree and
/// yields the same key every time an unchanged path is transferred.
pub fn object_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Transfer one file to the sink.
///
/// The entry is re-validated before upload: the path was captured at scan
/// time and the file system may have changed underneath it. A path that is a
/// directory by now is skipped and reported as a no-op, not a failure. Errors
/// are captured in the outcome; nothing here retries.
pub async fn transfer_file(sink: Arc<dyn ObjectSink>, path: PathBuf) -> TransferOutcome {
    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            return TransferOutcome::Failed {
                error: anyhow::Error::new(e)
                    .context(format!("failed to stat {}", path.display())),
                path,
            };
        }
    };

    if metadata.is_dir() {
        info!("skipping directory: {}", path.display());
        return TransferOutcome::SkippedDirectory { path };
    }

    let file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            return TransferOutcome::Failed {
                error: anyhow::Error::new(e)
                    .context(format!("failed to open {}", path.display())),
                path,
            };
        }
    };

    let key = object_key(&path);
    debug!("uploading {} ({} bytes)", path.display(), metadata.len());

    match sink.put(&key, Box::pin(file), metadata.len()).await {
        Ok(location) => {
            info!("uploaded {} to {}", key, location);
            TransferOutcome::Uploaded { key, location }
        }
        Err(error) => TransferOutcome::Failed {
            error: error.context(format!("failed to upload {}", path.display())),
            path,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use anyhow::{bail, Result};
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    use crate::sink::ObjectBody;

    /// Sink that keeps objects in memory and can be told to reject a key.
    #[derive(Default)]
    struct MemorySink {
        objects: Mutex<HashMap<String, Vec<u8>>>,
        reject_suffix: Option<String>,
    }

    #[async_trait::async_trait]
    impl ObjectSink for MemorySink {
        async fn put(&self, key: &str, mut body: ObjectBody, content_length: u64) -> Result<String> {
            if let Some(suffix) = &self.reject_suffix {
                if key.ends_with(suffix.as_str()) {
                    bail!("sink rejected {}", key);
                }
            }
            let mut contents = Vec::with_capacity(content_length as usize);
            body.read_to_end(&mut contents).await?;
            self.objects.lock().unwrap().insert(key.to_string(), contents);
            Ok(format!("mem://{}", key))
        }
    }

    #[tokio::test]
    async fn uploads_a_file_under_its_absolute_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, b"hello object storage").unwrap();
        let path = std::fs::canonicalize(&path).unwrap();

        let sink = Arc::new(MemorySink::default());
        let outcome = transfer_file(Arc::clone(&sink) as Arc<dyn ObjectSink>, path.clone()).await;

        match outcome {
            TransferOutcome::Uploaded { key, location } => {
                assert_eq!(key, path.to_string_lossy());
                assert_eq!(location, format!("mem://{}", key));
            }
            other => panic!("expected upload, got {:?}", other),
        }

        let objects = sink.objects.lock().unwrap();
        let stored = objects.get(&object_key(&path)).unwrap();
        assert_eq!(stored, b"hello object storage");
    }

    #[tokio::test]
    async fn directory_is_skipped_not_failed() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(MemorySink::default());

        let outcome =
            transfer_file(Arc::clone(&sink) as Arc<dyn ObjectSink>, dir.path().to_path_buf())
                .await;

        assert!(matches!(outcome, TransferOutcome::SkippedDirectory { .. }));
        assert!(sink.objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_yields_a_failure_with_the_path() {
        let sink: Arc<dyn ObjectSink> = Arc::new(MemorySink::default());
        let missing = PathBuf::from("/definitely/not/here.txt");

        match transfer_file(sink, missing.clone()).await {
            TransferOutcome::Failed { path, error } => {
                assert_eq!(path, missing);
                assert!(error.to_string().contains("failed to stat"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn sink_error_is_preserved_in_the_outcome() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.bin");
        std::fs::write(&path, b"payload").unwrap();

        let sink: Arc<dyn ObjectSink> = Arc::new(MemorySink {
            reject_suffix: Some("bad.bin".to_string()),
            ..Default::default()
        });

        match transfer_file(sink, path.clone()).await {
            TransferOutcome::Failed { path: failed, error } => {
                assert_eq!(failed, path);
                assert!(format!("{:#}", error).contains("sink rejected"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn key_derivation_is_idempotent() {
        let path = Path::new("/var/data/file.txt");
        assert_eq!(object_key(path), object_key(path));
        assert_eq!(object_key(path), "/var/data/file.txt");
    }
}
