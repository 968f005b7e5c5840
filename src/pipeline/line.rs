//! The per-line transformer and the state it carries across lines.

use super::image::{self, ImageTally};
use super::math;
use super::quote;
use super::sizer::{FsImageProbe, ImageProbe, ImageSizer};
use crate::config::ConversionConfig;
use std::path::PathBuf;

/// Cross-line state for one file. Create a fresh one per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Inside a quote that is being rewritten into an admonition.
    pub in_quote: bool,
    /// Between an opening and a closing `$$`.
    pub in_math_block: bool,
    /// `\tag{…}` lifted out of the current math block, emitted at its close.
    /// Empty unless `in_math_block`.
    pub pending_equation_tag: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rewrites Typora lines into Obsidian lines.
///
/// Stages run in a fixed order, each on the previous one's output:
///
/// 1. strip `\label{…}` (inside math)
/// 2. defer `\tag{…}` (inside math)
/// 3. `$$` → gathered open/close
/// 4. `>` quote → `ad-cite` admonition
/// 5. `<img>` → `![|width](src)`
#[derive(Debug, Clone)]
pub struct LineTransformer<P = FsImageProbe> {
    sizer: ImageSizer<P>,
}

impl LineTransformer<FsImageProbe> {
    /// Transformer for a note living in `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, config: &ConversionConfig) -> Self {
        Self::with_sizer(ImageSizer::new(base_dir, config.max_image_width))
    }
}

impl<P: ImageProbe> LineTransformer<P> {
    pub fn with_sizer(sizer: ImageSizer<P>) -> Self {
        Self { sizer }
    }

    /// Rewrite one line, updating `state`.
    pub fn transform(&self, line: &str, state: &mut SessionState) -> String {
        let mut tally = ImageTally::default();
        self.transform_counted(line, state, &mut tally)
    }

    /// [`transform`](Self::transform), also counting image outcomes into `tally`.
    pub fn transform_counted(
        &self,
        line: &str,
        state: &mut SessionState,
        tally: &mut ImageTally,
    ) -> String {
        let line = math::strip_labels(line, state);
        let line = math::relocate_tags(&line, state);
        let line = math::rewrite_delimiters(&line, state);
        let line = quote::rewrite_quote(&line, state);
        image::rewrite_images(&line, &self.sizer, tally)
    }
}
