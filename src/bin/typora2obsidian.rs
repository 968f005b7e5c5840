//! CLI binary for typora2obsidian.
//!
//! A thin shim over the library crate: takes the notes directory, converts
//! every Typora Markdown file under it and prints one line per file.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use typora2obsidian::{convert_directory, ConversionConfig, ConversionProgressCallback};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints a line per converted file to stderr.
struct CliProgressCallback;

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_files: usize) {
        eprintln!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_files} files…"))
        );
    }

    fn on_file_complete(&self, index: usize, total: usize, source: &Path, output: &Path) {
        eprintln!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            source.display(),
            dim(&format!("→ {}", output.display())),
        );
    }

    fn on_file_error(&self, index: usize, total: usize, source: &Path, error: &str) {
        eprintln!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            source.display(),
            red(error),
        );
    }

    fn on_conversion_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        if failed == 0 {
            eprintln!(
                "{} {} files converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files converted  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every note under ~/notes (writes foo.obsidian.md next to foo.md)
  typora2obsidian ~/notes

  # Show per-image decisions and file paths
  RUST_LOG=debug typora2obsidian ~/notes

WHAT IS REWRITTEN:
  <img src="a.png" style="zoom: 50%;">   →  ![|width](a.png)
  > quote                                →  ```ad-cite admonition
  $$ … $$                                →  $$\begin{gathered} … \end{gathered}$$
  \tag{…} inside $$                      →  moved before the closing $$
  \label{…} inside $$                    →  removed

Files whose path already contains "obsidian" are skipped, so running the
tool twice never converts its own output.
"#;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Convert Typora Markdown notes to Obsidian-compatible Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "typora2obsidian",
    version,
    about = "Convert Typora Markdown notes to Obsidian-compatible Markdown",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory to scan recursively for .md files.
    directory: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Per-image warnings and errors are shown by default; per-file progress
    // comes from the callback. RUST_LOG=info adds the library's own trace.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = ConversionConfig::builder()
        .progress_callback(Arc::new(CliProgressCallback))
        .build()
        .context("Invalid configuration")?;

    let output = convert_directory(&cli.directory, &config).context("Conversion failed")?;

    eprintln!(
        "   {} skipped  /  {} images resized  /  {} images kept  —  {}ms total",
        dim(&output.stats.files_skipped.to_string()),
        dim(&output.stats.images_rewritten.to_string()),
        dim(&output.stats.images_unchanged.to_string()),
        output.stats.total_duration_ms,
    );

    if !output.failures.is_empty() {
        anyhow::bail!("{} files failed to convert", output.failures.len());
    }

    Ok(())
}
