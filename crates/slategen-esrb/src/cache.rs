//! On-disk record cache.
//!
//! One JSON file per rating id. Cache failures are never fatal: an unwritable
//! directory degrades to the temp dir and then to no caching at all, and a
//! corrupt entry is ignored and refetched.

use std::path::{Path, PathBuf};

use slategen_core::RatingRecord;

const DEFAULT_DIR_NAME: &str = ".esrb-cache";
const FALLBACK_DIR_NAME: &str = "esrb-cache";

#[derive(Debug, Clone)]
pub struct RecordCache {
    dir: Option<PathBuf>,
}

/// Creates the directory and proves it is writable with a probe file.
fn ensure_writable(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".write-probe");
    match std::fs::write(&probe, b"") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

impl RecordCache {
    /// `.esrb-cache` under the working directory, degrading to the system
    /// temp dir, degrading to disabled.
    pub fn open_default() -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            let primary = cwd.join(DEFAULT_DIR_NAME);
            if ensure_writable(&primary) {
                return Self { dir: Some(primary) };
            }
        }

        let fallback = std::env::temp_dir().join(FALLBACK_DIR_NAME);
        if ensure_writable(&fallback) {
            tracing::warn!(
                dir = %fallback.display(),
                "primary cache directory unavailable, using temp fallback"
            );
            return Self { dir: Some(fallback) };
        }

        tracing::warn!("no writable cache directory available, record caching disabled");
        Self { dir: None }
    }

    /// A cache rooted at an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    fn entry_path(&self, id: u64) -> Option<PathBuf> {
        Some(self.dir.as_ref()?.join(format!("{id}.json")))
    }

    pub fn load(&self, id: u64) -> Option<RatingRecord> {
        let path = self.entry_path(id)?;
        let text = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&text) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "ignoring corrupt cache entry"
                );
                None
            }
        }
    }

    /// Best-effort store; records without an id are simply not cached.
    pub fn store(&self, record: &RatingRecord) {
        let Some(id) = record.esrb_id else {
            return;
        };
        let Some(path) = self.entry_path(id) else {
            return;
        };
        let json = match serde_json::to_string_pretty(record) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(id, error = %err, "failed to serialize record for caching");
                return;
            }
        };
        let write = self
            .dir
            .as_ref()
            .map(|dir| std::fs::create_dir_all(dir))
            .unwrap_or(Ok(()))
            .and_then(|()| std::fs::write(&path, json));
        if let Err(err) = write {
            tracing::warn!(path = %path.display(), error = %err, "failed to write cache entry");
        }
    }
}
