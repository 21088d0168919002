use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::sync::mpsc;
use walkdir::WalkDir;

/// Walk the tree under `root` depth-first and send every regular file,
/// resolved to its absolute path, down the channel.
///
/// Directories are never emitted and symlinks are not followed. Entries that
/// cannot be read are logged and skipped; traversal continues with their
/// siblings. Sending blocks while the queue is full, which is what couples
/// scanner speed to worker throughput, so this must run on a blocking thread
/// (`tokio::task::spawn_blocking`), never on the async runtime itself.
///
/// Paths are absolute so they can double as object keys without `.`/`..`
/// segments. Returns the number of files emitted. A closed receiver ends the
/// walk early, which is the cancellation hook for the pipeline.
pub fn scan_tree(root: &Path, paths: &mpsc::Sender<PathBuf>) -> u64 {
    debug!("scanning directory tree under {}", root.display());
    let mut discovered = 0u64;

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let absolute = match fs::canonicalize(entry.path()) {
            Ok(path) => path,
            Err(e) => {
                warn!(
                    "skipping {}: could not resolve absolute path: {}",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };

        debug!("discovered {}", absolute.display());
        if paths.blocking_send(absolute).is_err() {
            // Receiver gone: the pipeline stopped listening, stop emitting.
            debug!("path queue closed, stopping scan");
            break;
        }
        discovered += 1;
    }

    debug!("scan of {} finished, {} files", root.display(), discovered);
    discovered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs::File;

    use tempfile::TempDir;

    /// Run the scanner over `root` with a queue deep enough that nothing
    /// blocks, returning the count and the emitted paths.
    fn scan_all(root: &Path) -> (u64, Vec<PathBuf>) {
        let (tx, mut rx) = mpsc::channel(1024);
        let discovered = scan_tree(root, &tx);
        drop(tx);

        let mut emitted = Vec::new();
        while let Some(path) = rx.blocking_recv() {
            emitted.push(path);
        }
        (discovered, emitted)
    }

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    #[test]
    fn empty_directory_emits_nothing() {
        let dir = TempDir::new().unwrap();
        let (discovered, emitted) = scan_all(dir.path());
        assert_eq!(discovered, 0);
        assert!(emitted.is_empty());
    }

    #[test]
    fn emits_every_file_and_no_directories() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.txt"));
        touch(&dir.path().join("b.txt"));
        touch(&dir.path().join("c.txt"));
        fs::create_dir_all(dir.path().join("sub/inner")).unwrap();
        touch(&dir.path().join("sub/d.txt"));
        touch(&dir.path().join("sub/inner/e.txt"));

        let (discovered, emitted) = scan_all(dir.path());
        assert_eq!(discovered, 5);
        assert_eq!(emitted.len(), 5);
        for path in &emitted {
            assert!(path.is_absolute(), "{} is not absolute", path.display());
            assert!(path.is_file());
        }
    }

    #[test]
    fn count_matches_emitted_paths() {
        let dir = TempDir::new().unwrap();
        for i in 0..10 {
            touch(&dir.path().join(format!("file-{i}")));
        }

        let (discovered, emitted) = scan_all(dir.path());
        assert_eq!(discovered as usize, emitted.len());
    }

    #[test]
    fn rescanning_an_unmodified_tree_is_deterministic() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("x/y")).unwrap();
        touch(&dir.path().join("one"));
        touch(&dir.path().join("x/two"));
        touch(&dir.path().join("x/y/three"));

        let (first_count, first) = scan_all(dir.path());
        let (second_count, second) = scan_all(dir.path());

        assert_eq!(first_count, second_count);
        let first: BTreeSet<_> = first.into_iter().collect();
        let second: BTreeSet<_> = second.into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn nonexistent_root_emits_nothing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let (discovered, emitted) = scan_all(&missing);
        assert_eq!(discovered, 0);
        assert!(emitted.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_emitted_or_followed() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("real.txt"));
        fs::create_dir(dir.path().join("linked")).unwrap();
        touch(&dir.path().join("linked/inside.txt"));
        std::os::unix::fs::symlink(
            dir.path().join("real.txt"),
            dir.path().join("file-link"),
        )
        .unwrap();
        std::os::unix::fs::symlink(dir.path().join("linked"), dir.path().join("dir-link"))
            .unwrap();

        let (discovered, emitted) = scan_all(dir.path());
        // real.txt and linked/inside.txt once each, links contribute nothing
        assert_eq!(discovered, 2);
        assert_eq!(emitted.len(), 2);
    }

    #[test]
    fn stops_when_the_receiver_is_dropped() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            touch(&dir.path().join(format!("file-{i}")));
        }

        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let discovered = scan_tree(dir.path(), &tx);
        assert_eq!(discovered, 0);
    }
}
