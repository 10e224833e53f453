//! Configuration types for folder-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. One struct for every knob means a
//! batch run can share a single config across all of its lines.

use crate::error::Img2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points per inch in PDF user space.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Configuration for converting a folder of images into a PDF.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use folder2pdf::{ConversionConfig, PageSize, SortOrder};
///
/// let config = ConversionConfig::builder()
///     .page_size(PageSize::A4)
///     .margin_pt(18.0)
///     .sort_order(SortOrder::Natural)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// How each page is sized. Default: [`PageSize::FitImage`].
    pub page_size: PageSize,

    /// Pixel density used to turn image pixels into points when
    /// `page_size` is [`PageSize::FitImage`]. Range: 72–600. Default: 150.
    ///
    /// At 72 DPI one pixel is one point. A 2480 × 3508 scan at 300 DPI
    /// comes out as an A4 page.
    pub dpi: u32,

    /// White border around the image on fixed paper sizes, in points.
    /// Ignored for [`PageSize::FitImage`]. Default: 0.
    pub margin_pt: f32,

    /// Page order rule. Default: [`SortOrder::Lexicographic`].
    pub sort_order: SortOrder,

    /// What to do when one image fails to decode. Default: [`DecodePolicy::Skip`].
    pub decode_policy: DecodePolicy,

    /// Document `/Title`. If None, the output file stem is used.
    pub title: Option<String>,

    /// Number of CSV lines converted at the same time in batch mode. Default: 1.
    ///
    /// Every line writes its own output, so lines are independent. The
    /// report is always in line order regardless of this value.
    pub batch_concurrency: usize,

    /// Optional progress callback for per-image and per-line events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            dpi: 150,
            margin_pt: 0.0,
            sort_order: SortOrder::default(),
            decode_policy: DecodePolicy::default(),
            title: None,
            batch_concurrency: 1,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("page_size", &self.page_size)
            .field("dpi", &self.dpi)
            .field("margin_pt", &self.margin_pt)
            .field("sort_order", &self.sort_order)
            .field("decode_policy", &self.decode_policy)
            .field("title", &self.title)
            .field("batch_concurrency", &self.batch_concurrency)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
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
    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn margin_pt(mut self, margin: f32) -> Self {
        self.config.margin_pt = margin;
        self
    }

    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.config.sort_order = order;
        self
    }

    pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.config.decode_policy = policy;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn batch_concurrency(mut self, n: usize) -> Self {
        self.config.batch_concurrency = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Img2PdfError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(Img2PdfError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if !c.margin_pt.is_finite() || c.margin_pt < 0.0 {
            return Err(Img2PdfError::InvalidConfig(format!(
                "Margin must be a non-negative number of points, got {}",
                c.margin_pt
            )));
        }
        if let Some((w, h)) = c.page_size.paper_dimensions() {
            if c.margin_pt * 2.0 >= w.min(h) {
                return Err(Img2PdfError::InvalidConfig(format!(
                    "Margin {}pt leaves no room on a {}×{}pt page",
                    c.margin_pt, w, h
                )));
            }
        }
        if c.batch_concurrency == 0 {
            return Err(Img2PdfError::InvalidConfig(
                "Batch concurrency must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the page box of each PDF page is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// Page is exactly the image size at the configured DPI; the image
    /// fills the page. (default)
    #[default]
    FitImage,
    /// ISO A4 paper (595 × 842 pt), oriented to match the image.
    A4,
    /// US Letter paper (612 × 792 pt), oriented to match the image.
    Letter,
}

impl PageSize {
    /// Portrait paper dimensions in points, or None for [`PageSize::FitImage`].
    pub fn paper_dimensions(&self) -> Option<(f32, f32)> {
        match self {
            PageSize::FitImage => None,
            PageSize::A4 => Some((595.0, 842.0)),
            PageSize::Letter => Some((612.0, 792.0)),
        }
    }
}

/// Rule that turns a folder listing into the page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Byte-wise comparison of file names. Case-sensitive: `B.png` comes
    /// before `a.png`. (default)
    #[default]
    Lexicographic,
    /// Digit runs compare by numeric value, so `pag_2.jpg` comes before
    /// `pag_10.jpg`. Ties fall back to byte-wise order.
    Natural,
}

/// What happens when one image in the folder cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodePolicy {
    /// Log a warning, leave the image out and keep going. (default)
    #[default]
    Skip,
    /// Fail the whole conversion with `ImageDecodeFailed`; nothing is written.
    Abort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.page_size, PageSize::FitImage);
        assert_eq!(c.dpi, 150);
        assert_eq!(c.sort_order, SortOrder::Lexicographic);
        assert_eq!(c.decode_policy, DecodePolicy::Skip);
        assert_eq!(c.batch_concurrency, 1);
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn builder_clamps() {
        let c = ConversionConfig::builder()
            .dpi(10)
            .batch_concurrency(0)
            .build()
            .unwrap();
        assert_eq!(c.dpi, 72);
        assert_eq!(c.batch_concurrency, 1);

        let c = ConversionConfig::builder().dpi(9000).build().unwrap();
        assert_eq!(c.dpi, 600);
    }

    #[test]
    fn negative_margin_rejected() {
        let err = ConversionConfig::builder()
            .margin_pt(-1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Img2PdfError::InvalidConfig(_)));
    }

    #[test]
    fn margin_must_leave_room_on_paper() {
        let err = ConversionConfig::builder()
            .page_size(PageSize::A4)
            .margin_pt(300.0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("no room"), "got: {err}");

        // The same margin is ignored when pages follow the image.
        assert!(ConversionConfig::builder().margin_pt(300.0).build().is_ok());
    }

    #[test]
    fn paper_dimensions() {
        assert_eq!(PageSize::FitImage.paper_dimensions(), None);
        assert_eq!(PageSize::A4.paper_dimensions(), Some((595.0, 842.0)));
        assert_eq!(PageSize::Letter.paper_dimensions(), Some((612.0, 792.0)));
    }
}
