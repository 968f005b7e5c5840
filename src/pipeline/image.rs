//! `<img src="…">` → `![|width](…)`.
//!
//! Obsidian does not resolve relative paths inside raw HTML image elements,
//! but it does inside Markdown image links, and it accepts a display width
//! after a `|` in the alt text. Typora records user resizing as
//! `style="zoom: N%;"`; that zoom is folded into the computed width.
//!
//! Every failure here is local to one element: it is logged and the element
//! is left exactly as it was.

use super::rewrite_matches;
use super::sizer::{ImageProbe, ImageSizer};
use super::input;
use crate::error::{ImageError, ZoomError};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, warn};

/// Cheap pre-check before running the element regex.
const IMG_MARKER: &str = "<img src=";

static RE_IMG_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img src="([^>]+)"[^>]*>"#).unwrap());

/// How many `<img>` elements were rewritten or kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageTally {
    pub rewritten: usize,
    pub unchanged: usize,
}

/// Replace every `<img>` element on the line.
///
/// On a table row the `|` of the inserted `[|width]` is escaped so it does
/// not end the cell.
pub fn rewrite_images<P: ImageProbe>(
    line: &str,
    sizer: &ImageSizer<P>,
    tally: &mut ImageTally,
) -> String {
    if !line.contains(IMG_MARKER) {
        return line.to_string();
    }
    let separator = if line.trim_start().starts_with('|') {
        r"\|"
    } else {
        "|"
    };

    rewrite_matches(line, &RE_IMG_ELEMENT, |element| {
        match size_element(element, sizer) {
            Ok((width, src)) => {
                tally.rewritten += 1;
                format!("![{separator}{width}]({src})")
            }
            Err(e) => {
                match &e {
                    ImageError::Remote { .. } => warn!("{e}"),
                    _ => error!("{e}"),
                }
                tally.unchanged += 1;
                element.to_string()
            }
        }
    })
}

/// Width and source of one element.
fn size_element<'a, P: ImageProbe>(
    element: &'a str,
    sizer: &ImageSizer<P>,
) -> Result<(u32, &'a str), ImageError> {
    let src = element_src(element);
    if input::is_remote(src) {
        return Err(ImageError::Remote {
            url: src.to_string(),
        });
    }
    let intrinsic = sizer.intrinsic_width(src)?;
    let zoom = parse_zoom(element).unwrap_or_else(|e| {
        error!("{e}; using 100%");
        None
    });
    Ok((sizer.scale(intrinsic, zoom), src))
}

/// The `src` value: the text between the first pair of double quotes.
fn element_src(element: &str) -> &str {
    element.split('"').nth(1).unwrap_or_default()
}

/// Extract the zoom percentage from `style="zoom: N%;"`.
///
/// `Ok(None)` when there is no style attribute at all.
pub fn parse_zoom(element: &str) -> Result<Option<u32>, ZoomError> {
    let Some((_, rest)) = element.split_once("style=\"") else {
        return Ok(None);
    };
    let style = rest.split('"').next().unwrap_or_default().trim();

    if style.split(';').filter(|d| !d.is_empty()).count() > 1 {
        return Err(ZoomError::ComplexStyle {
            style: style.to_string(),
        });
    }
    let Some(value) = style.strip_prefix("zoom:") else {
        return Err(ZoomError::NotZoom {
            style: style.to_string(),
        });
    };
    let value = value.trim_matches(['%', ';']).trim();
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ZoomError::InvalidValue {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sizer::tests::FixedProbe;

    fn sizer() -> ImageSizer<FixedProbe> {
        let probe = FixedProbe::with(&[("doc/a.png", 800), ("doc/wide.png", 2000)]);
        ImageSizer::with_probe(probe, "doc", 1000)
    }

    fn rewrite(line: &str) -> (String, ImageTally) {
        let mut tally = ImageTally::default();
        let out = rewrite_images(line, &sizer(), &mut tally);
        (out, tally)
    }

    #[test]
    fn zoomed_image_rewritten() {
        let (out, tally) = rewrite(r#"see <img src="a.png" alt="x" style="zoom: 50%;"> here"#);
        assert_eq!(out, "see ![|520](a.png) here");
        assert_eq!(tally.rewritten, 1);
    }

    #[test]
    fn image_without_style_uses_full_size() {
        let (out, _) = rewrite(r#"<img src="wide.png">"#);
        assert_eq!(out, "![|1000](wide.png)");
    }

    #[test]
    fn every_element_on_line_rewritten() {
        let (out, tally) = rewrite(r#"<img src="a.png"> and <img src="a.png" style="zoom:50%">"#);
        assert_eq!(out, "![|1000](a.png) and ![|520](a.png)");
        assert_eq!(tally.rewritten, 2);
    }

    #[test]
    fn remote_image_passes_through() {
        let line = r#"x <img src="http://example.com/a.png"> y"#;
        let (out, tally) = rewrite(line);
        assert_eq!(out, line);
        assert_eq!(tally.unchanged, 1);
    }

    #[test]
    fn missing_image_passes_through() {
        let line = r#"<img src="gone.png" style="zoom: 50%;">"#;
        let (out, tally) = rewrite(line);
        assert_eq!(out, line);
        assert_eq!(tally, ImageTally { rewritten: 0, unchanged: 1 });
    }

    #[test]
    fn table_row_escapes_inserted_pipe() {
        let (out, _) = rewrite(r#"| cell | <img src="a.png" style="zoom: 50%;"> |"#);
        assert_eq!(out, r"| cell | ![\|520](a.png) |");
    }

    #[test]
    fn bad_style_falls_back_to_full_zoom() {
        let (out, _) = rewrite(r#"<img src="a.png" style="width: 10px;">"#);
        // 800 * 1.3 = 1040, capped
        assert_eq!(out, "![|1000](a.png)");
    }

    #[test]
    fn parse_zoom_variants() {
        assert_eq!(parse_zoom(r#"<img src="a.png">"#), Ok(None));
        assert_eq!(parse_zoom(r#"<img src="a.png" style="zoom: 30%;">"#), Ok(Some(30)));
        assert_eq!(parse_zoom(r#"<img src="a.png" style="zoom:125%">"#), Ok(Some(125)));
        assert!(matches!(
            parse_zoom(r#"<img src="a.png" style="zoom: 30%; width: 2px">"#),
            Err(ZoomError::ComplexStyle { .. })
        ));
        assert!(matches!(
            parse_zoom(r#"<img src="a.png" style="width: 30%;">"#),
            Err(ZoomError::NotZoom { .. })
        ));
        assert!(matches!(
            parse_zoom(r#"<img src="a.png" style="zoom: big;">"#),
            Err(ZoomError::InvalidValue { .. })
        ));
    }

    #[test]
    fn line_without_img_untouched() {
        let (out, tally) = rewrite("plain ![md](a.png) text");
        assert_eq!(out, "plain ![md](a.png) text");
        assert_eq!(tally, ImageTally::default());
    }
}
