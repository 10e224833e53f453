//! Page geometry: where an image of a given pixel size lands on its page.
//!
//! All values are PDF points (1/72 inch) with the origin at the bottom-left
//! corner of the page.

use crate::config::{ConversionConfig, POINTS_PER_INCH};

/// Largest page side readers accept (200 inches).
pub const MAX_PAGE_SIDE: f32 = 14_400.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    /// Lower-left corner of the drawn image.
    pub x: f32,
    pub y: f32,
    pub draw_width: f32,
    pub draw_height: f32,
}

/// Compute the page box and image placement for one image.
///
/// With [`crate::PageSize::FitImage`] the page is the image at `config.dpi`
/// and the image covers it exactly; a page whose longer side would exceed
/// [`MAX_PAGE_SIDE`] is scaled down to it. With paper sizes the sheet is
/// turned landscape for wide images and the image is scaled, up or down, to
/// the largest size that fits inside the margins, then centred. Aspect ratio
/// is always kept.
pub fn page_geometry(width_px: u32, height_px: u32, config: &ConversionConfig) -> PageGeometry {
    let (w, h) = (width_px as f32, height_px as f32);

    let Some((paper_w, paper_h)) = config.page_size.paper_dimensions() else {
        let mut scale = POINTS_PER_INCH / config.dpi as f32;
        let longest = w.max(h) * scale;
        if longest > MAX_PAGE_SIDE {
            scale *= MAX_PAGE_SIDE / longest;
        }
        let (pw, ph) = (w * scale, h * scale);
        return PageGeometry {
            page_width: pw,
            page_height: ph,
            x: 0.0,
            y: 0.0,
            draw_width: pw,
            draw_height: ph,
        };
    };

    let (pw, ph) = if w > h {
        (paper_w.max(paper_h), paper_w.min(paper_h))
    } else {
        (paper_w.min(paper_h), paper_w.max(paper_h))
    };

    let margin = config.margin_pt;
    let scale = ((pw - 2.0 * margin) / w).min((ph - 2.0 * margin) / h);
    let (dw, dh) = (w * scale, h * scale);

    PageGeometry {
        page_width: pw,
        page_height: ph,
        x: (pw - dw) / 2.0,
        y: (ph - dh) / 2.0,
        draw_width: dw,
        draw_height: dh,
    }
}
