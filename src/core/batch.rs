//! Batch hashing.
//!
//! Hashes many files in parallel with rayon. Each file gets its own result:
//! one unreadable or wrongly sized image never aborts the rest.

use crate::core::hasher::{PerceptualHash, PerceptualHasher, ScaleFunction};
use crate::error::HashError;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Outcome of hashing one file
#[derive(Debug)]
pub struct BatchItem {
    /// The file that was hashed
    pub path: PathBuf,
    /// Its hash, or why it could not be hashed
    pub result: Result<PerceptualHash, HashError>,
}

/// Outcome of a whole batch, in input order
#[derive(Debug)]
pub struct BatchResult {
    pub items: Vec<BatchItem>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl BatchResult {
    /// Items that hashed successfully
    pub fn hashed(&self) -> impl Iterator<Item = (&Path, &PerceptualHash)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().ok().map(|hash| (item.path.as_path(), hash)))
    }

    /// Items that failed
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &HashError)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().err().map(|err| (item.path.as_path(), err)))
    }

    /// Number of failed items
    pub fn error_count(&self) -> usize {
        self.failures().count()
    }
}

/// Hash every file in `paths`
pub fn hash_files<F>(paths: &[PathBuf], hasher: &PerceptualHasher, scaler: &F) -> BatchResult
where
    F: ScaleFunction + ?Sized,
{
    hash_files_with_progress(paths, hasher, scaler, |_, _| {})
}

/// Hash every file in `paths`, calling `on_item(completed, item)` as each one finishes.
///
/// `on_item` runs on worker threads, in completion order.
pub fn hash_files_with_progress<F, P>(
    paths: &[PathBuf],
    hasher: &PerceptualHasher,
    scaler: &F,
    on_item: P,
) -> BatchResult
where
    F: ScaleFunction + ?Sized,
    P: Fn(usize, &BatchItem) + Sync,
{
    let start_time = Instant::now();
    let completed = AtomicUsize::new(0);

    tracing::debug!(total = paths.len(), "hashing batch");

    let items: Vec<BatchItem> = paths
        .par_iter()
        .map(|path| {
            let result = hasher.hash_file(path, scaler);
            if let Err(e) = &result {
                tracing::warn!(path = %path.display(), error = %e, "failed to hash file");
            }

            let item = BatchItem {
                path: path.clone(),
                result,
            };
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            on_item(done, &item);
            item
        })
        .collect();

    let result = BatchResult {
        items,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };

    tracing::debug!(
        total = paths.len(),
        errors = result.error_count(),
        duration_ms = result.duration_ms,
        "batch complete"
    );

    result
}
