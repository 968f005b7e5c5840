//! # typora2obsidian
//!
//! Rewrite Markdown written in Typora into Markdown that Obsidian renders the
//! same way.
//!
//! ## What changes
//!
//! Typora and Obsidian agree on most of CommonMark but disagree on a few
//! constructs that are common in technical notes:
//!
//! | Typora | Obsidian output |
//! |--------|-----------------|
//! | `<img src="a.png" style="zoom: 50%;">` | `![\|520](a.png)` (width from the file) |
//! | `> quote` spanning multi-line math | `ad-cite` admonition block |
//! | `$$ … \\ … $$` | `$$\begin{gathered} … \end{gathered}$$` |
//! | `\tag{1}` inside the block | moved after `\end{gathered}` |
//! | `\label{eq}` | removed |
//!
//! The rewrite is line-based and regex-driven: it is not a Markdown parser,
//! and inline code containing `$$` or `>` is not protected.
//!
//! ## Pipeline Overview
//!
//! ```text
//! notes/
//!  │
//!  ├─ 1. Walk     every *.md not already containing "obsidian" in its path
//!  ├─ 2. Read     one file, fresh SessionState
//!  ├─ 3. Rewrite  LineTransformer, line by line (math → quote → image)
//!  └─ 4. Write    sibling *.obsidian.md (temp file + rename)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use typora2obsidian::{convert_directory, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert_directory("notes", &config)?;
//!     eprintln!("{} files converted", output.stats.files_converted);
//!     Ok(())
//! }
//! ```
//!
//! Single lines can be rewritten directly:
//!
//! ```rust
//! use typora2obsidian::{ConversionConfig, LineTransformer, SessionState};
//!
//! let transformer = LineTransformer::new(".", &ConversionConfig::default());
//! let mut state = SessionState::new();
//! assert_eq!(transformer.transform("$$", &mut state), r"$$\begin{gathered}");
//! assert!(state.in_math_block);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `typora2obsidian` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, COSMETIC_UPSCALE_PERCENT};
pub use convert::{
    convert_directory, convert_file, convert_str, derive_output_name, is_already_converted,
};
pub use error::{ConvertError, ImageError, ZoomError};
pub use output::{ConversionOutput, ConversionStats, FileReport};
pub use pipeline::line::{LineTransformer, SessionState};
pub use pipeline::sizer::{FsImageProbe, ImageProbe, ImageSizer};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
