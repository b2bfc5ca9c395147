//! Warm in-memory snapshot of the served directory with cold-read fallback.
//!
//! # Responsibilities
//! - Read every file under the served directory once at startup
//! - Answer lookups from memory, or from disk when the snapshot has nothing
//!   usable for the path
//! - Classify read failures (missing, directory, other I/O)
//!
//! # Design Decisions
//! - The snapshot is complete before the listener accepts traffic
//! - A file that failed to load keeps a `Failed` entry; lookups for it go to
//!   disk
//! - Cold reads are never written back; the snapshot is immutable
//! - No eviction or size bound: the directory is a fixed development asset set

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::{stream, StreamExt};
use thiserror::Error;
use walkdir::WalkDir;

/// Maximum number of files read concurrently during the startup scan.
const SCAN_CONCURRENCY: usize = 64;

/// Failure to produce the bytes for a path.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no such file: {}", .0.display())]
    NotFound(PathBuf),

    #[error("path is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Snapshot state of one file.
#[derive(Debug, Clone)]
pub enum ContentEntry {
    /// File content read during the scan.
    Loaded(Bytes),
    /// The scan could not read the file.
    Failed,
}

/// File content keyed by absolute path.
#[derive(Debug, Default)]
pub struct ContentStore {
    entries: HashMap<PathBuf, ContentEntry>,
}

impl ContentStore {
    /// A store with an empty snapshot; every lookup is a cold read.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan `root` and read every file beneath it.
    ///
    /// Unreadable files are recorded as [`ContentEntry::Failed`] rather than
    /// failing the scan.
    pub async fn populate(root: &Path) -> Result<Self, ContentError> {
        let walk_root = root.to_path_buf();
        let files = tokio::task::spawn_blocking(move || list_files(&walk_root))
            .await
            .map_err(|e| ContentError::Io {
                path: root.to_path_buf(),
                source: io::Error::other(e),
            })?;

        let entries: HashMap<PathBuf, ContentEntry> = stream::iter(files)
            .map(|path| async move {
                let entry = match tokio::fs::read(&path).await {
                    Ok(content) => ContentEntry::Loaded(Bytes::from(content)),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to load file into memory");
                        ContentEntry::Failed
                    }
                };
                (path, entry)
            })
            .buffer_unordered(SCAN_CONCURRENCY)
            .collect()
            .await;

        Ok(Self { entries })
    }

    /// Build a store from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (PathBuf, ContentEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Snapshot bytes for `path`, if loaded.
    pub fn cached(&self, path: &Path) -> Option<&Bytes> {
        match self.entries.get(path) {
            Some(ContentEntry::Loaded(content)) => Some(content),
            _ => None,
        }
    }

    /// Content for `path`: the snapshot when it has the file, otherwise a
    /// direct read from disk.
    pub async fn get(&self, path: &Path) -> Result<Bytes, ContentError> {
        if let Some(content) = self.cached(path) {
            return Ok(content.clone());
        }

        match tokio::fs::read(path).await {
            Ok(content) => Ok(Bytes::from(content)),
            Err(e) => Err(classify(path, e).await),
        }
    }

    /// Returns true if anything (file or directory) exists at `path` on disk.
    pub async fn exists(&self, path: &Path) -> bool {
        self.entries.contains_key(path) || tokio::fs::metadata(path).await.is_ok()
    }

    /// Number of snapshot entries, failed ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries the scan failed to read.
    pub fn failed_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, ContentEntry::Failed))
            .count()
    }
}

fn list_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

async fn classify(path: &Path, err: io::Error) -> ContentError {
    // Reading a directory fails differently per platform; ask the filesystem.
    if let Ok(metadata) = tokio::fs::metadata(path).await {
        if metadata.is_dir() {
            return ContentError::IsDirectory(path.to_path_buf());
        }
    }
    match err.kind() {
        io::ErrorKind::NotFound => ContentError::NotFound(path.to_path_buf()),
        _ => ContentError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    }
}
