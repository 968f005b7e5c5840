//! Configuration types for Typora-to-Obsidian conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The knobs are few: the image width
//! cap, the token inserted into output file names, and the source extension.
//! The cosmetic upscale applied to every image is a constant
//! ([`COSMETIC_UPSCALE_PERCENT`]), deliberately not a config field.

use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Every computed image width is widened by this percentage before capping.
///
/// Typora renders images noticeably larger than Obsidian at the same pixel
/// width; 30% brings them back to roughly the size they had in Typora.
pub const COSMETIC_UPSCALE_PERCENT: u32 = 30;

/// Default cap on the emitted `![|width](...)` value, in pixels.
pub const DEFAULT_MAX_IMAGE_WIDTH: u32 = 1000;

/// Default token inserted before the extension of output files.
pub const DEFAULT_OUTPUT_TOKEN: &str = "obsidian";

/// Configuration for a Typora-to-Obsidian conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use typora2obsidian::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .max_image_width(800)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_image_width, 800);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Maximum display width written into image references. Default: 1000.
    pub max_image_width: u32,

    /// Token inserted before the final extension of each output file, and
    /// the substring that marks a path as already converted. Default: `"obsidian"`.
    pub output_token: String,

    /// Extension (without the dot) of the files to convert. Matched
    /// case-sensitively. Default: `"md"`.
    pub extension: String,

    /// Optional per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_image_width: DEFAULT_MAX_IMAGE_WIDTH,
            output_token: DEFAULT_OUTPUT_TOKEN.to_string(),
            extension: "md".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("max_image_width", &self.max_image_width)
            .field("output_token", &self.output_token)
            .field("extension", &self.extension)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn max_image_width(mut self, px: u32) -> Self {
        self.config.max_image_width = px;
        self
    }

    pub fn output_token(mut self, token: impl Into<String>) -> Self {
        self.config.output_token = token.into();
        self
    }

    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.config.extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.max_image_width == 0 {
            return Err(ConvertError::InvalidConfig(
                "max image width must be ≥ 1".into(),
            ));
        }
        if c.output_token.is_empty() || c.output_token.contains(['.', '/', '\\']) {
            return Err(ConvertError::InvalidConfig(format!(
                "output token must be a non-empty file-name fragment without dots or separators, got {:?}",
                c.output_token
            )));
        }
        if c.extension.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "extension must not be empty".into(),
            ));
        }
        if c.extension.contains(&c.output_token) {
            return Err(ConvertError::InvalidConfig(format!(
                "extension {:?} contains the output token {:?}; every file would be skipped",
                c.extension, c.output_token
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.max_image_width, 1000);
        assert_eq!(c.output_token, "obsidian");
        assert_eq!(c.extension, "md");
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn builder_strips_leading_dot_from_extension() {
        let c = ConversionConfig::builder().extension(".markdown").build().unwrap();
        assert_eq!(c.extension, "markdown");
    }

    #[test]
    fn zero_width_rejected() {
        let err = ConversionConfig::builder().max_image_width(0).build().unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
    }

    #[test]
    fn dotted_token_rejected() {
        assert!(ConversionConfig::builder().output_token("ob.sidian").build().is_err());
        assert!(ConversionConfig::builder().output_token("").build().is_err());
    }

    #[test]
    fn debug_hides_callback() {
        let c = ConversionConfig::builder()
            .progress_callback(std::sync::Arc::new(crate::progress::NoopProgressCallback))
            .build()
            .unwrap();
        let s = format!("{c:?}");
        assert!(s.contains("<dyn ConversionProgressCallback>"));
    }
}
