//! Error types for the typora2obsidian library.
//!
//! Two tiers of errors reflect two distinct failure modes:
//!
//! * [`ConvertError`]: **Fatal for a file or a run.** The input directory
//!   does not exist, a Markdown file cannot be read, or its output cannot be
//!   written. Returned as `Err(ConvertError)` from the `convert*` functions.
//!
//! * [`ImageError`] and [`ZoomError`]: **Non-fatal.** A single `<img>`
//!   element could not be sized. The transformer logs the error and falls
//!   back (element left unchanged, or zoom treated as 100%). These never
//!   escape a line.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors returned by the conversion entry points.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The path given to [`crate::convert_directory`] is not a directory.
    #[error("Not a directory: '{path}'\nPass the folder that contains your Typora notes.")]
    NotADirectory { path: PathBuf },

    /// The source Markdown file could not be read (missing, permissions, not UTF-8).
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has no extension, so no sibling output name can be derived.
    #[error("Cannot derive an output name for '{path}': file has no extension")]
    NoExtension { path: PathBuf },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the converted Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// At least one file in a directory run failed.
    ///
    /// Returned by [`crate::output::ConversionOutput::into_result`] when the
    /// caller wants to treat any file failure as an error.
    #[error("{failed}/{total} files failed during conversion")]
    PartialFailure { failed: usize, total: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why an `<img>` element was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// The `src` is an `http`/`https` URL; there is no local file to measure.
    #[error("non-local image '{url}'")]
    Remote { url: String },

    /// The referenced file does not exist relative to the note's directory.
    #[error("image file not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The file exists but its format could not be identified.
    #[error("cannot read image '{path}': {detail}")]
    Unreadable { path: PathBuf, detail: String },
}

/// Why a `style` attribute did not yield a zoom percentage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoomError {
    /// More than one `;`-separated declaration.
    #[error("unsupported complex style attribute '{style}'")]
    ComplexStyle { style: String },

    /// A single declaration, but not `zoom:`.
    #[error("only zoom style supported, got '{style}'")]
    NotZoom { style: String },

    /// `zoom:` followed by something that is not an integer.
    #[error("'{value}' is not a valid numeric zoom value")]
    InvalidValue { value: String },
}
