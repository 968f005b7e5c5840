//! Image source resolution: classify an `<img src>` value and turn local
//! ones into a path relative to the note that references them.
//!
//! Typora writes image paths relative to the Markdown file, not to the
//! directory the tool was launched from. Every lookup therefore takes the
//! note's directory explicitly; the process working directory is never
//! consulted or changed.

use std::path::{Path, PathBuf};

/// Check if the source points at a remote image.
///
/// Anything starting with `http` counts, which covers `http://` and
/// `https://`.
pub fn is_remote(src: &str) -> bool {
    src.starts_with("http")
}

/// Resolve a local image source against the note's directory.
///
/// Absolute sources are returned unchanged (`Path::join` semantics).
pub fn resolve_local(base_dir: &Path, src: &str) -> PathBuf {
    base_dir.join(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/a.png"));
        assert!(is_remote("http://example.com/a.png"));
        assert!(!is_remote("img/a.png"));
        assert!(!is_remote("/tmp/a.png"));
        assert!(!is_remote(""));
    }

    #[test]
    fn relative_source_joins_base() {
        let p = resolve_local(Path::new("/notes/math"), "img/a.png");
        assert_eq!(p, PathBuf::from("/notes/math/img/a.png"));
    }

    #[test]
    fn absolute_source_ignores_base() {
        let p = resolve_local(Path::new("/notes"), "/pics/a.png");
        assert_eq!(p, PathBuf::from("/pics/a.png"));
    }

    #[test]
    fn empty_base_keeps_source() {
        let p = resolve_local(Path::new(""), "a.png");
        assert_eq!(p, PathBuf::from("a.png"));
    }
}
