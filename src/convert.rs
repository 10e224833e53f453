//! Folder Converter: one folder of images in, one PDF out.
//!
//! The work is synchronous file-system and CPU work. The async entry point
//! moves it onto tokio's blocking pool so that batch runs can drive several
//! folders from one runtime; [`convert_folder_sync`] runs it on the calling
//! thread.

use crate::config::{ConversionConfig, DecodePolicy};
use crate::error::Img2PdfError;
use crate::output::{ConversionPlan, ConversionStats};
use crate::pipeline::assemble::{self, PageSpec};
use crate::pipeline::scan::{self, ImageFile};
use crate::pipeline::{decode, layout, write};
use crate::request::ConversionRequest;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert one folder into one PDF.
///
/// # Returns
/// `Ok(ConversionStats)` once the PDF has been written, even if some images
/// were skipped under [`DecodePolicy::Skip`] (see `stats.skipped`).
///
/// # Errors
/// - `InvalidOutputName` — `pdf_name` is empty or names a directory
/// - `FolderNotFound` — the folder is missing or not a directory
/// - `NoImagesFound` — nothing in the folder has a PNG/JPG/JPEG name
/// - `ImageDecodeFailed` — an image failed under [`DecodePolicy::Abort`]
/// - `AllImagesFailed` — every image failed under [`DecodePolicy::Skip`]
/// - `WriteFailed` — the output could not be written
///
/// The output path is not touched on any error.
pub async fn convert_folder(
    request: &ConversionRequest,
    config: &ConversionConfig,
) -> Result<ConversionStats, Img2PdfError> {
    let request = request.clone();
    let config = config.clone();

    tokio::task::spawn_blocking(move || convert_folder_sync(&request, &config))
        .await
        .map_err(|e| Img2PdfError::Internal(format!("Conversion task panicked: {e}")))?
}

/// Blocking version of [`convert_folder`].
pub fn convert_folder_sync(
    request: &ConversionRequest,
    config: &ConversionConfig,
) -> Result<ConversionStats, Img2PdfError> {
    let total_start = Instant::now();
    check_output_name(request)?;
    let folder = request.folder_path();
    let output = request.output_path();
    info!("Converting {} → {}", folder.display(), output.display());

    // ── Step 1: List and order candidate images ──────────────────────────
    let images = scan::list_images(folder, config.sort_order)?;
    if images.is_empty() {
        return Err(Img2PdfError::NoImagesFound {
            path: folder.to_path_buf(),
        });
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(folder, images.len());
    }

    let result = render_and_write(folder, output, &images, config, total_start);
    if let (Err(e), Some(cb)) = (&result, &config.progress_callback) {
        cb.on_conversion_error(folder, &e.to_string());
    }
    result
}

/// Steps 2 to 4: decode, assemble, write. Runs after the start event.
fn render_and_write(
    folder: &Path,
    output: PathBuf,
    images: &[ImageFile],
    config: &ConversionConfig,
    total_start: Instant,
) -> Result<ConversionStats, Img2PdfError> {
    let total = images.len();

    // ── Step 2: Decode and place every image ─────────────────────────────
    let decode_start = Instant::now();
    let mut pages = Vec::with_capacity(total);
    let mut skipped = Vec::new();

    for (idx, file) in images.iter().enumerate() {
        match decode::decode_image(&file.path) {
            Ok(image) => {
                let geometry = layout::page_geometry(image.width, image.height, config);
                debug!(
                    "Page {}: {} at {:.1}×{:.1}pt",
                    pages.len() + 1,
                    file.path.display(),
                    geometry.page_width,
                    geometry.page_height
                );
                if let Some(ref cb) = config.progress_callback {
                    cb.on_image_complete(idx + 1, total, &file.path);
                }
                pages.push(PageSpec { image, geometry });
            }
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_image_error(idx + 1, total, &file.path, &e.to_string());
                }
                match config.decode_policy {
                    DecodePolicy::Abort => return Err(e.into()),
                    DecodePolicy::Skip => {
                        warn!("Skipping image {}", e);
                        skipped.push(e);
                    }
                }
            }
        }
    }
    let decode_duration_ms = decode_start.elapsed().as_millis() as u64;

    if pages.is_empty() {
        let first_error = skipped
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(Img2PdfError::AllImagesFailed {
            folder: folder.to_path_buf(),
            total,
            first_error,
        });
    }

    // ── Step 3: Assemble the document in memory ──────────────────────────
    let page_files: Vec<_> = pages.iter().map(|p| p.image.source.clone()).collect();
    let title = config
        .title
        .clone()
        .unwrap_or_else(|| default_title(&output));

    let assembly_failed = |e: lopdf::Error| Img2PdfError::PdfAssemblyFailed {
        path: output.clone(),
        detail: e.to_string(),
    };
    let mut doc = assemble::build_document(pages, &title).map_err(assembly_failed)?;
    let bytes = assemble::to_bytes(&mut doc).map_err(assembly_failed)?;
    drop(doc);

    // ── Step 4: Replace the output file ──────────────────────────────────
    write::write_atomic(&output, &bytes)?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(&output, page_files.len(), skipped.len());
    }

    let stats = ConversionStats {
        folder: folder.to_path_buf(),
        output,
        candidate_images: total,
        pages: page_files,
        skipped,
        bytes_written: bytes.len() as u64,
        decode_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Wrote {} ({} pages, {} skipped, {}ms)",
        stats.output.display(),
        stats.page_count(),
        stats.skipped.len(),
        stats.total_duration_ms
    );

    Ok(stats)
}

/// List what [`convert_folder`] would turn into pages, in page order,
/// without decoding or writing anything.
pub fn plan_folder(
    request: &ConversionRequest,
    config: &ConversionConfig,
) -> Result<ConversionPlan, Img2PdfError> {
    check_output_name(request)?;
    let images = scan::list_images(request.folder_path(), config.sort_order)?;
    if images.is_empty() {
        return Err(Img2PdfError::NoImagesFound {
            path: request.folder_path().to_path_buf(),
        });
    }
    Ok(ConversionPlan {
        folder: request.folder_path().to_path_buf(),
        output: request.output_path(),
        images,
    })
}

fn check_output_name(request: &ConversionRequest) -> Result<(), Img2PdfError> {
    if request.has_output_file_name() {
        Ok(())
    } else {
        Err(Img2PdfError::InvalidOutputName {
            path: request.pdf_name().to_path_buf(),
        })
    }
}

/// The output file stem, used when no title is configured.
fn default_title(output: &Path) -> String {
    output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "folder2pdf".to_string())
}
