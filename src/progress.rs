//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as [`crate::convert_directory`] walks a notes folder.
//!
//! # Example
//!
//! ```rust
//! use typora2obsidian::{ConversionProgressCallback, ConversionConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, index: usize, total: usize, source: &Path, _output: &Path) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index, total, source.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the directory driver as it processes each file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Files are processed sequentially, but the trait is
/// `Send + Sync` so a callback can be shared with other threads.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, after the walk, before any file is converted.
    ///
    /// # Arguments
    /// * `total_files`: number of files that will be converted
    fn on_conversion_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is opened.
    ///
    /// # Arguments
    /// * `index`: 1-indexed position of the file in the run
    /// * `total`: total files in the run
    /// * `source`: the Markdown file being converted
    fn on_file_start(&self, index: usize, total: usize, source: &Path) {
        let _ = (index, total, source);
    }

    /// Called when a file has been written successfully.
    fn on_file_complete(&self, index: usize, total: usize, source: &Path, output: &Path) {
        let _ = (index, total, source, output);
    }

    /// Called when reading or writing a file failed.
    ///
    /// # Arguments
    /// * `error`: human-readable error description
    fn on_file_error(&self, index: usize, total: usize, source: &Path, error: &str) {
        let _ = (index, total, source, error);
    }

    /// Called once after all files have been attempted.
    ///
    /// # Arguments
    /// * `total_files`: files attempted
    /// * `success_count`: files that converted without error
    fn on_conversion_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        let p = Path::new("a.md");
        cb.on_conversion_start(2);
        cb.on_file_start(1, 2, p);
        cb.on_file_complete(1, 2, p, Path::new("a.obsidian.md"));
        cb.on_file_error(2, 2, p, "denied");
        cb.on_conversion_complete(2, 1);
    }
}
