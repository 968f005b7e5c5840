//! File- and directory-level conversion entry points.
//!
//! A run walks a notes folder, picks every Markdown file that has not been
//! converted already, and writes a sibling `<stem>.obsidian.<ext>` next to
//! it. Sources are never modified.
//!
//! Files are converted one after another. Each gets a fresh
//! [`SessionState`] and a [`LineTransformer`] rooted at the file's own
//! directory, so relative image paths resolve the way Typora meant them.
//!
//! A file that cannot be read or written fails on its own: the error is
//! logged and recorded in [`ConversionOutput::failures`], and the run moves
//! on to the next file.

use crate::config::{ConversionConfig, DEFAULT_OUTPUT_TOKEN};
use crate::error::ConvertError;
use crate::output::{ConversionOutput, ConversionStats, FileReport};
use crate::pipeline::image::ImageTally;
use crate::pipeline::line::{LineTransformer, SessionState};
use crate::pipeline::sizer::ImageProbe;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Any of the three line terminators: `\r\n`, lone `\r`, lone `\n`.
static RE_LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Converted text of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertedText {
    pub markdown: String,
    pub lines: usize,
    pub images: ImageTally,
}

/// Convert every eligible Markdown file under `root`.
///
/// # Errors
/// Returns `Err` only when `root` is not a directory. Per-file failures are
/// collected in [`ConversionOutput::failures`]; use
/// [`ConversionOutput::into_result`] to treat them as fatal.
pub fn convert_directory(
    root: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let total_start = Instant::now();
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(ConvertError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    info!("Scanning {}", root.display());

    // ── Step 1: Walk ─────────────────────────────────────────────────────
    let found = collect_markdown_files(root, &config.extension);
    let (skipped, pending): (Vec<PathBuf>, Vec<PathBuf>) = found
        .iter()
        .cloned()
        .partition(|p| is_already_converted(p, &config.output_token));
    for path in &skipped {
        debug!("Skipping converted file {}", path.display());
    }
    info!(
        "Found {} files, {} already converted",
        found.len(),
        skipped.len()
    );

    // ── Step 2: Convert one by one ───────────────────────────────────────
    let total = pending.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    let mut output = ConversionOutput::default();
    for (i, source) in pending.into_iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(index, total, &source);
        }
        match convert_file(&source, config) {
            Ok(report) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_complete(index, total, &report.source, &report.output);
                }
                output.files.push(report);
            }
            Err(e) => {
                error!("{}", e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_error(index, total, &source, &e.to_string());
                }
                output.failures.push((source, e));
            }
        }
    }

    // ── Step 3: Stats ────────────────────────────────────────────────────
    output.stats = ConversionStats {
        files_found: found.len(),
        files_skipped: skipped.len(),
        files_converted: output.files.len(),
        files_failed: output.failures.len(),
        total_lines: output.files.iter().map(|f| f.lines).sum(),
        images_rewritten: output.files.iter().map(|f| f.images_rewritten).sum(),
        images_unchanged: output.files.iter().map(|f| f.images_unchanged).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {}/{} files, {}ms total",
        output.stats.files_converted, total, output.stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total, output.stats.files_converted);
    }

    Ok(output)
}

/// Convert one Markdown file into its sibling output file.
///
/// The skip rule is not applied here; callers that walk directories should
/// check [`is_already_converted`] first.
pub fn convert_file(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<FileReport, ConvertError> {
    let source = source.as_ref();
    let output = derive_output_name_with(source, &config.output_token).ok_or_else(|| {
        ConvertError::NoExtension {
            path: source.to_path_buf(),
        }
    })?;
    info!("Processing file {} -> {}", source.display(), output.display());

    let text = std::fs::read_to_string(source).map_err(|e| ConvertError::ReadFailed {
        path: source.to_path_buf(),
        source: e,
    })?;

    let base_dir = source.parent().unwrap_or_else(|| Path::new(""));
    let transformer = LineTransformer::new(base_dir, config);
    let converted = convert_text(&text, &transformer);
    if converted.lines == 0 {
        debug!("{} is empty", source.display());
    }

    let permissions = std::fs::metadata(source).map(|m| m.permissions()).ok();
    write_atomic(&output, converted.markdown.as_bytes(), permissions)?;

    Ok(FileReport {
        source: source.to_path_buf(),
        output,
        lines: converted.lines,
        images_rewritten: converted.images.rewritten,
        images_unchanged: converted.images.unchanged,
    })
}

/// Convert a whole document held in memory.
///
/// Relative image sources resolve against `base_dir`.
pub fn convert_str(text: &str, base_dir: impl Into<PathBuf>, config: &ConversionConfig) -> String {
    convert_text(text, &LineTransformer::new(base_dir, config)).markdown
}

/// Run every line of `text` through `transformer` with a fresh session.
///
/// Lines end at `\r\n`, `\r` or `\n`; every output line ends with a
/// single `\n`.
pub fn convert_text<P: ImageProbe>(text: &str, transformer: &LineTransformer<P>) -> ConvertedText {
    let mut state = SessionState::new();
    let mut result = ConvertedText::default();
    result.markdown.reserve(text.len() + text.len() / 8);

    for line in split_lines(text) {
        let rewritten = transformer.transform_counted(line, &mut state, &mut result.images);
        result.markdown.push_str(&rewritten);
        result.markdown.push('\n');
        result.lines += 1;
    }

    if state.in_quote {
        warn!("Document ends inside a block quote; admonition fence left open");
    }
    if state.in_math_block {
        warn!("Document ends inside a $$ block; gathered environment left open");
    }
    result
}

/// Split on any line terminator. A final terminator does not start an
/// extra empty line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut parts: Vec<&str> = RE_LINE_BREAK.split(text).collect();
    if parts.last().is_some_and(|l| l.is_empty()) {
        parts.pop();
    }
    parts.into_iter()
}

/// Recursively list files with extension `ext` (case-sensitive) under `root`.
///
/// Unreadable entries are logged and skipped; the walk continues. Symlinks
/// are not descended into, but a symlink to a regular file is listed.
pub fn collect_markdown_files(root: &Path, ext: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("{}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file() || (e.path_is_symlink() && e.path().is_file()))
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|x| x == ext))
        .collect()
}

/// `notes.md` → `notes.obsidian.md`.
///
/// `None` when the path has no extension.
pub fn derive_output_name(path: impl AsRef<Path>) -> Option<PathBuf> {
    derive_output_name_with(path.as_ref(), DEFAULT_OUTPUT_TOKEN)
}

/// [`derive_output_name`] with a custom token.
pub fn derive_output_name_with(path: &Path, token: &str) -> Option<PathBuf> {
    let ext = path.extension()?;
    let mut name = path.file_stem()?.to_os_string();
    name.push(".");
    name.push(token);
    name.push(".");
    name.push(ext);
    Some(path.with_file_name(name))
}

/// Whether the full path of `path` contains `token`.
///
/// Relative paths are made absolute first, so a token in any ancestor
/// directory counts.
pub fn is_already_converted(path: &Path, token: &str) -> bool {
    let full = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    full.to_string_lossy().contains(token)
}

/// Write to a temp file beside `path`, then rename over it.
///
/// The temp file is created owner-only; `permissions` (the source's) are
/// applied before the rename when given.
fn write_atomic(
    path: &Path,
    bytes: &[u8],
    permissions: Option<std::fs::Permissions>,
) -> Result<(), ConvertError> {
    let write_err = |source| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    if let Some(perms) = permissions {
        tmp.as_file().set_permissions(perms).map_err(write_err)?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_inserts_token() {
        assert_eq!(
            derive_output_name("notes.md"),
            Some(PathBuf::from("notes.obsidian.md"))
        );
        assert_eq!(
            derive_output_name("dir/a.b.md"),
            Some(PathBuf::from("dir/a.b.obsidian.md"))
        );
        assert_eq!(derive_output_name("README"), None);
    }

    #[test]
    fn derived_name_is_skipped() {
        let out = derive_output_name("notes.md").unwrap();
        assert!(is_already_converted(&out, "obsidian"));
    }

    #[test]
    fn custom_token() {
        let p = derive_output_name_with(Path::new("n.md"), "vault").unwrap();
        assert_eq!(p, PathBuf::from("n.vault.md"));
    }

    #[test]
    fn text_line_endings_normalised() {
        let out = convert_str("a\r\nb\r\n\r\nc", "", &ConversionConfig::default());
        assert_eq!(out, "a\nb\n\nc\n");
    }

    #[test]
    fn lone_carriage_returns_end_lines() {
        let config = ConversionConfig::default();
        assert_eq!(convert_str("a\rb\r\rc\r", "", &config), "a\nb\n\nc\n");
        assert_eq!(
            convert_str("> q\rafter\r", "", &config),
            "```ad-cite\ntitle:\nq\n```\nafter\n"
        );
    }

    #[test]
    fn mixed_terminators_and_trailing_blank_line() {
        let out = convert_str("a\r\nb\rc\n\n", "", &ConversionConfig::default());
        assert_eq!(out, "a\nb\nc\n\n");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_note_is_collected() {
        let dir = tempfile::tempdir().unwrap();
        let real_dir = tempfile::tempdir().unwrap();
        let target = real_dir.path().join("real.md");
        std::fs::write(&target, "x\n").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.md")).unwrap();

        let files = collect_markdown_files(dir.path(), "md");
        assert_eq!(files, vec![dir.path().join("link.md")]);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("link.md")).unwrap();
        assert!(collect_markdown_files(dir.path(), "md").is_empty());
    }

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(convert_str("", "", &ConversionConfig::default()), "");
    }

    #[test]
    fn quote_then_paragraph() {
        let out = convert_str("> cited\n> more\n\nbody\n", "", &ConversionConfig::default());
        assert_eq!(out, "```ad-cite\ntitle:\ncited\nmore\n```\n\nbody\n");
    }

    #[test]
    fn missing_directory_rejected() {
        let err = convert_directory("/definitely/not/here", &ConversionConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::NotADirectory { .. }));
    }
}
