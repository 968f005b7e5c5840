//! Display-width computation for local images.
//!
//! ```text
//! width = min( floor(floor(intrinsic × zoom / 100) × 1.3), max_image_width )
//! ```
//!
//! The intrinsic width comes from an [`ImageProbe`]. [`FsImageProbe`] reads
//! it from the image header on disk; tests substitute a fixed-size probe so
//! the arithmetic can be checked without image files.

use super::input;
use crate::config::COSMETIC_UPSCALE_PERCENT;
use crate::error::ImageError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Zoom applied when the `<img>` has no usable `style="zoom: N%"`.
pub const DEFAULT_ZOOM_PERCENT: u32 = 100;

/// Source of intrinsic image widths.
pub trait ImageProbe {
    /// Pixel width of the image at `path`.
    fn width(&self, path: &Path) -> Result<u32, ImageError>;
}

/// Reads widths from image files, decoding only the header.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageProbe;

impl ImageProbe for FsImageProbe {
    fn width(&self, path: &Path) -> Result<u32, ImageError> {
        match image::image_dimensions(path) {
            Ok((width, height)) => {
                debug!("Probed {} → {}×{}", path.display(), width, height);
                Ok(width)
            }
            Err(image::ImageError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                Err(ImageError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => Err(ImageError::Unreadable {
                path: path.to_path_buf(),
                detail: e.to_string(),
            }),
        }
    }
}

/// Computes `![|width]` values for the images of one note.
#[derive(Debug, Clone)]
pub struct ImageSizer<P = FsImageProbe> {
    probe: P,
    base_dir: PathBuf,
    max_width: u32,
}

impl ImageSizer<FsImageProbe> {
    /// Sizer resolving sources against `base_dir`, the note's own directory.
    pub fn new(base_dir: impl Into<PathBuf>, max_width: u32) -> Self {
        Self::with_probe(FsImageProbe, base_dir, max_width)
    }
}

impl<P: ImageProbe> ImageSizer<P> {
    pub fn with_probe(probe: P, base_dir: impl Into<PathBuf>, max_width: u32) -> Self {
        Self {
            probe,
            base_dir: base_dir.into(),
            max_width,
        }
    }

    /// Intrinsic width of the image `src` refers to.
    pub fn intrinsic_width(&self, src: &str) -> Result<u32, ImageError> {
        self.probe.width(&input::resolve_local(&self.base_dir, src))
    }

    /// Apply zoom, upscale and cap to an intrinsic width.
    pub fn scale(&self, intrinsic: u32, zoom: Option<u32>) -> u32 {
        scale_width(intrinsic, zoom, self.max_width)
    }

    /// Probe `src` and compute its display width.
    pub fn compute_width(&self, src: &str, zoom: Option<u32>) -> Result<u32, ImageError> {
        let intrinsic = self.intrinsic_width(src)?;
        Ok(self.scale(intrinsic, zoom))
    }
}

/// Pure width arithmetic, in integers so every step floors.
pub fn scale_width(intrinsic: u32, zoom: Option<u32>, max_width: u32) -> u32 {
    let zoom = u64::from(zoom.unwrap_or(DEFAULT_ZOOM_PERCENT));
    let scaled = u64::from(intrinsic) * zoom / 100;
    let scaled = scaled + scaled * u64::from(COSMETIC_UPSCALE_PERCENT) / 100;
    // the cap is a u32, so the result fits
    scaled.min(u64::from(max_width)) as u32
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Probe backed by a name → width table; unknown names are "not found".
    #[derive(Default)]
    pub(crate) struct FixedProbe(pub HashMap<PathBuf, u32>);

    impl FixedProbe {
        pub(crate) fn with(entries: &[(&str, u32)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(p, w)| (PathBuf::from(p), *w))
                    .collect(),
            )
        }
    }

    impl ImageProbe for FixedProbe {
        fn width(&self, path: &Path) -> Result<u32, ImageError> {
            self.0.get(path).copied().ok_or_else(|| ImageError::NotFound {
                path: path.to_path_buf(),
            })
        }
    }

    #[test]
    fn half_zoom_then_upscale() {
        assert_eq!(scale_width(800, Some(50), 1000), 520);
    }

    #[test]
    fn wide_image_capped() {
        assert_eq!(scale_width(2000, Some(100), 1000), 1000);
        assert_eq!(scale_width(2000, None, 1000), 1000);
    }

    #[test]
    fn missing_zoom_means_full_size() {
        assert_eq!(scale_width(100, None, 1000), 130);
    }

    #[test]
    fn each_step_floors() {
        // 333 * 33 / 100 = 109.89 → 109; 109 * 1.3 = 141.7 → 141
        assert_eq!(scale_width(333, Some(33), 1000), 141);
    }

    #[test]
    fn huge_values_do_not_overflow() {
        assert_eq!(scale_width(u32::MAX, Some(u32::MAX), 1000), 1000);
    }

    #[test]
    fn sizer_resolves_against_base_dir() {
        let probe = FixedProbe::with(&[("notes/img/a.png", 800)]);
        let sizer = ImageSizer::with_probe(probe, "notes", 1000);
        assert_eq!(sizer.compute_width("img/a.png", Some(50)), Ok(520));
        assert!(matches!(
            sizer.compute_width("img/b.png", None),
            Err(ImageError::NotFound { .. })
        ));
    }

    #[test]
    fn fs_probe_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsImageProbe.width(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, ImageError::NotFound { .. }));
    }

    #[test]
    fn fs_probe_reads_png_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.png");
        image::RgbImage::new(37, 2).save(&path).unwrap();
        assert_eq!(FsImageProbe.width(&path), Ok(37));
    }

    #[test]
    fn fs_probe_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(
            FsImageProbe.width(&path),
            Err(ImageError::Unreadable { .. })
        ));
    }
}
