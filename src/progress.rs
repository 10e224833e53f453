//! Progress-callback trait for per-image and per-line conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as folders are converted and batch lines complete. Callers can
//! forward them to a terminal progress bar, a log, or a channel; the
//! library does not know how they are displayed.
//!
//! # Example
//!
//! ```rust
//! use folder2pdf::{ConversionProgressCallback, ConversionConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     pages: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, index: usize, total: usize, file: &Path) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index, total, file.display());
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { pages: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the converter and the batch driver as work progresses.
///
/// Implementations must be `Send + Sync`: image decoding runs on the
/// blocking thread pool and batch lines may run concurrently. All methods
/// have default no-op implementations.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once per folder, after listing, before any image is decoded.
    ///
    /// # Arguments
    /// * `folder`       — the folder being converted
    /// * `total_images` — number of candidate images in page order
    fn on_conversion_start(&self, folder: &Path, total_images: usize) {
        let _ = (folder, total_images);
    }

    /// Called when an image has been decoded and will become a page.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in page order
    /// * `total` — candidate images in the folder
    /// * `file`  — the image file
    fn on_image_complete(&self, index: usize, total: usize, file: &Path) {
        let _ = (index, total, file);
    }

    /// Called when an image fails to decode.
    fn on_image_error(&self, index: usize, total: usize, file: &Path, error: &str) {
        let _ = (index, total, file, error);
    }

    /// Called once per folder after the PDF has been written.
    ///
    /// # Arguments
    /// * `output`     — the written PDF
    /// * `page_count` — pages in the document
    /// * `skipped`    — images left out because they failed to decode
    fn on_conversion_complete(&self, output: &Path, page_count: usize, skipped: usize) {
        let _ = (output, page_count, skipped);
    }

    /// Called when a conversion fails after [`Self::on_conversion_start`]:
    /// an image under [`crate::DecodePolicy::Abort`], every image, or the
    /// write. No PDF was written.
    fn on_conversion_error(&self, folder: &Path, error: &str) {
        let _ = (folder, error);
    }

    /// Called once per batch after the CSV has been parsed.
    ///
    /// # Arguments
    /// * `total_lines` — non-blank lines, malformed ones included
    fn on_batch_start(&self, total_lines: usize) {
        let _ = total_lines;
    }

    /// Called once per non-blank CSV line, in completion order.
    ///
    /// `error` is None when the line converted successfully.
    fn on_line_complete(&self, line_number: usize, error: Option<&str>) {
        let _ = (line_number, error);
    }

    /// Called once after every line has been attempted.
    fn on_batch_complete(&self, succeeded: usize, failed: usize) {
        let _ = (succeeded, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        pages: AtomicUsize,
        lines_failed: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, _folder: &Path, total_images: usize) {
            self.started_total.store(total_images, Ordering::SeqCst);
        }

        fn on_image_complete(&self, _index: usize, _total: usize, _file: &Path) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_error(&self, _index: usize, _total: usize, _file: &Path, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _output: &Path, page_count: usize, _skipped: usize) {
            self.pages.store(page_count, Ordering::SeqCst);
        }

        fn on_line_complete(&self, _line_number: usize, error: Option<&str>) {
            if error.is_some() {
                self.lines_failed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(Path::new("imgs"), 3);
        cb.on_image_complete(1, 3, Path::new("imgs/a.png"));
        cb.on_image_error(2, 3, Path::new("imgs/b.png"), "bad");
        cb.on_conversion_complete(Path::new("out.pdf"), 2, 1);
        cb.on_conversion_error(Path::new("imgs"), "write failed");
        cb.on_batch_start(2);
        cb.on_line_complete(1, None);
        cb.on_batch_complete(1, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(Path::new("imgs"), 3);
        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);

        tracker.on_image_complete(1, 3, Path::new("imgs/a.png"));
        tracker.on_image_error(2, 3, Path::new("imgs/b.png"), "truncated");
        tracker.on_image_complete(3, 3, Path::new("imgs/c.png"));
        tracker.on_conversion_complete(Path::new("out.pdf"), 2, 1);

        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 2);

        tracker.on_line_complete(1, None);
        tracker.on_line_complete(2, Some("malformed"));
        assert_eq!(tracker.lines_failed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_line_complete(1, None);
    }
}
