//! Image decoding: file → pixel samples ready to embed as a PDF image.
//!
//! Everything is decoded to 8-bit samples and re-compressed with Flate, so
//! PNG and JPEG sources go through one code path. Content sniffing decides
//! the decoder; the extension only decided whether the file was a
//! candidate at all.

use crate::error::ImageError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::DynamicImage;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// PDF colour space of the decoded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRgb => "DeviceRGB",
        }
    }

    pub fn components(&self) -> usize {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRgb => 3,
        }
    }
}

/// A decoded image with Flate-compressed samples.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    /// zlib-compressed colour samples, 8 bits per component.
    pub samples: Vec<u8>,
    /// zlib-compressed 8-bit alpha channel; None when fully opaque.
    pub alpha: Option<Vec<u8>>,
}

/// Read and decode one image file.
pub fn decode_image(path: &Path) -> Result<PreparedImage, ImageError> {
    let bytes = std::fs::read(path).map_err(|e| ImageError::ReadFailed {
        file: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let img = image::load_from_memory(&bytes).map_err(|e| ImageError::DecodeFailed {
        file: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    prepare_image(path, &img)
}

/// Split a decoded image into colour samples and an optional soft mask.
pub fn prepare_image(path: &Path, img: &DynamicImage) -> Result<PreparedImage, ImageError> {
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(ImageError::DecodeFailed {
            file: path.to_path_buf(),
            detail: format!("image has no pixels ({width}x{height})"),
        });
    }

    let color = img.color();
    let (color_space, raw) = if color.has_color() {
        (ColorSpace::DeviceRgb, img.to_rgb8().into_raw())
    } else {
        (ColorSpace::DeviceGray, img.to_luma8().into_raw())
    };

    let alpha = if color.has_alpha() {
        let channel: Vec<u8> = if color.has_color() {
            img.to_rgba8().pixels().map(|p| p.0[3]).collect()
        } else {
            img.to_luma_alpha8().pixels().map(|p| p.0[1]).collect()
        };
        // An all-opaque mask changes nothing on the page.
        (!channel.iter().all(|&a| a == u8::MAX)).then_some(channel)
    } else {
        None
    };

    let compress_failed = |e: std::io::Error| ImageError::DecodeFailed {
        file: path.to_path_buf(),
        detail: format!("compressing samples: {e}"),
    };
    let samples = deflate(&raw).map_err(compress_failed)?;
    let alpha = alpha
        .map(|a| deflate(&a))
        .transpose()
        .map_err(compress_failed)?;

    debug!(
        "Decoded {} → {}x{} {} (alpha: {}), {} bytes compressed",
        path.display(),
        width,
        height,
        color_space.pdf_name(),
        alpha.is_some(),
        samples.len()
    );

    Ok(PreparedImage {
        source: path.to_path_buf(),
        width,
        height,
        color_space,
        samples,
        alpha,
    })
}

fn deflate(raw: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut enc = ZlibEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::default());
    enc.write_all(raw)?;
    enc.finish()
}
