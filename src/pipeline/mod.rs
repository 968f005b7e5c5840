//! Per-line rewrite stages for Typora-to-Obsidian conversion.
//!
//! Each submodule implements exactly one textual transformation. The
//! [`line`] module composes them, in a fixed order, into the
//! [`LineTransformer`](line::LineTransformer) that the driver feeds one line
//! at a time.
//!
//! ## Data Flow
//!
//! ```text
//! line ──▶ math ──────────▶ quote ──────▶ image ──▶ rewritten line
//!          (\label, \tag,    (> → ad-cite) (<img> → ![|w](url))
//!           $$ gathered)                      │
//!                                             └──▶ sizer ──▶ input
//!                                                  (width)   (path)
//! ```
//!
//! 1. [`math`]: strip `\label{}`, defer `\tag{}`, wrap display math in a
//!    `gathered` environment
//! 2. [`quote`]: turn block quotes into `ad-cite` admonitions
//! 3. [`image`]: replace `<img src="…">` with sized Markdown image links
//! 4. [`sizer`]: intrinsic width × zoom × upscale, capped
//! 5. [`input`]: classify and resolve image sources against the note's folder

pub mod image;
pub mod input;
pub mod line;
pub mod math;
pub mod quote;
pub mod sizer;

use regex::Regex;

/// Replace every non-overlapping match of `re` in `line` with `f(match)`.
///
/// Text between matches is copied through untouched.
pub fn rewrite_matches(line: &str, re: &Regex, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for m in re.find_iter(line) {
        out.push_str(&line[last..m.start()]);
        out.push_str(&f(m.as_str()));
        last = m.end();
    }
    out.push_str(&line[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_matches_maps_each_match() {
        let re = Regex::new(r"\d+").unwrap();
        let out = rewrite_matches("a1 b22 c", &re, |m| format!("<{m}>"));
        assert_eq!(out, "a<1> b<22> c");
    }

    #[test]
    fn rewrite_matches_without_match_is_identity() {
        let re = Regex::new(r"\d+").unwrap();
        assert_eq!(rewrite_matches("no digits", &re, |_| unreachable!()), "no digits");
    }
}
