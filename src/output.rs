//! Result types returned by the conversion entry points.

use crate::error::ConvertError;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of converting one Markdown file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// The Typora source file.
    pub source: PathBuf,
    /// The sibling file that was written.
    pub output: PathBuf,
    /// Lines read from the source (each is written back exactly once).
    pub lines: usize,
    /// `<img>` elements replaced by `![|width](url)`.
    pub images_rewritten: usize,
    /// `<img>` elements left as-is (remote, missing or unreadable).
    pub images_unchanged: usize,
}

/// Totals for a directory run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Files with the configured extension found under the root.
    pub files_found: usize,
    /// Files skipped because their path already contains the output token.
    pub files_skipped: usize,
    /// Files written successfully.
    pub files_converted: usize,
    /// Files whose read or write failed.
    pub files_failed: usize,
    pub total_lines: usize,
    pub images_rewritten: usize,
    pub images_unchanged: usize,
    pub total_duration_ms: u64,
}

/// Everything produced by [`crate::convert_directory`].
#[derive(Debug, Default)]
pub struct ConversionOutput {
    /// One entry per successfully converted file, in walk order.
    pub files: Vec<FileReport>,
    /// Files that failed, with the error that stopped them.
    pub failures: Vec<(PathBuf, ConvertError)>,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Turn any file failure into an error, for callers that want all-or-nothing.
    pub fn into_result(self) -> Result<Self, ConvertError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(ConvertError::PartialFailure {
                failed: self.failures.len(),
                total: self.stats.files_converted + self.stats.files_failed,
            })
        }
    }
}
