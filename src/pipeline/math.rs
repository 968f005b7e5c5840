//! Display-math normalisation.
//!
//! Obsidian's MathJax setup differs from Typora's in three ways that matter:
//!
//! - `\label{…}` is unsupported, so labels are dropped.
//! - `\\` line breaks are ignored in bare `$$ … $$` blocks, so every block is
//!   wrapped in a `gathered` environment.
//! - `\tag{…}` is only accepted after the last environment directive, so the
//!   tag is lifted out of the block body and re-emitted right before the
//!   closing `$$`.
//!
//! Label and tag handling only applies to lines *inside* a block; the
//! opening line is not inspected.

use super::line::SessionState;
use once_cell::sync::Lazy;
use regex::Regex;

/// Display-math delimiter.
pub const DISPLAY_DELIMITER: &str = "$$";
pub const GATHERED_OPEN: &str = r"\begin{gathered}";
pub const GATHERED_CLOSE: &str = r"\end{gathered}";

static RE_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\label\{[^}]+\}").unwrap());
static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\tag\{[^}]+\}").unwrap());

/// Remove every `\label{…}` from a line inside a math block.
pub fn strip_labels(line: &str, state: &SessionState) -> String {
    if !state.in_math_block || !line.contains(r"\label{") {
        return line.to_string();
    }
    RE_LABEL.replace_all(line, "").into_owned()
}

/// Move `\tag{…}` out of a line inside a math block.
///
/// Only the last tag on the line is kept; earlier ones are discarded.
pub fn relocate_tags(line: &str, state: &mut SessionState) -> String {
    if !state.in_math_block {
        return line.to_string();
    }
    let Some(last) = RE_TAG.find_iter(line).last() else {
        return line.to_string();
    };
    state.pending_equation_tag = last.as_str().to_string();
    RE_TAG.replace_all(line, "").into_owned()
}

/// Open or close a display-math block.
///
/// Fires only when `$$` occurs exactly once (non-overlapping) on the line.
pub fn rewrite_delimiters(line: &str, state: &mut SessionState) -> String {
    if line.matches(DISPLAY_DELIMITER).count() != 1 {
        return line.to_string();
    }

    let rewritten = if state.in_math_block {
        let tag = std::mem::take(&mut state.pending_equation_tag);
        line.replacen(
            DISPLAY_DELIMITER,
            &format!("{GATHERED_CLOSE}{tag}{DISPLAY_DELIMITER}"),
            1,
        )
    } else {
        line.replacen(
            DISPLAY_DELIMITER,
            &format!("{DISPLAY_DELIMITER}{GATHERED_OPEN}"),
            1,
        )
    };
    state.in_math_block = !state.in_math_block;
    rewritten
}
