//! Block quote → `ad-cite` admonition.
//!
//! Obsidian cannot render multi-line math inside a `>` quote but can inside
//! an Admonition plugin block, so quotes are re-fenced. An empty `title:`
//! suppresses the admonition header.

use super::line::SessionState;

/// Emitted in front of the first line of a quote.
pub const ADMONITION_OPEN: &str = "```ad-cite\ntitle:\n";
/// Emitted in front of the first line after a quote.
pub const ADMONITION_CLOSE: &str = "```\n";

/// Rewrite one line of a possible block quote.
///
/// Only one level of `>` is removed; `>> nested` keeps its inner marker.
pub fn rewrite_quote(line: &str, state: &mut SessionState) -> String {
    let quoted = line.trim_start().starts_with('>');
    match (state.in_quote, quoted) {
        (false, true) => {
            state.in_quote = true;
            format!("{ADMONITION_OPEN}{}", unquote(line))
        }
        (true, true) => unquote(line).to_string(),
        (true, false) => {
            state.in_quote = false;
            format!("{ADMONITION_CLOSE}{line}")
        }
        (false, false) => line.to_string(),
    }
}

fn unquote(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed.strip_prefix('>').unwrap_or(trimmed).trim_start()
}
