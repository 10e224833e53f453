//! # folder2pdf
//!
//! Assemble a folder of PNG/JPG/JPEG images into a single PDF, one image
//! per page, or do the same for every line of a CSV batch file.
//!
//! ## Pipeline Overview
//!
//! ```text
//! folder
//!  │
//!  ├─ 1. Scan      list *.png / *.jpg / *.jpeg (any case), sort by name
//!  ├─ 2. Decode    decode each image, skip or abort on failures
//!  ├─ 3. Layout    size the page to the image (or fit it on A4/Letter)
//!  ├─ 4. Assemble  build the PDF in memory with lopdf
//!  └─ 5. Write     temp file + rename over the target
//! ```
//!
//! The batch driver parses `folder_path;pdf_name` lines and runs the same
//! pipeline once per line, collecting a [`BatchReport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folder2pdf::{convert_folder, run_batch, ConversionConfig, ConversionRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!
//!     let stats = convert_folder(&ConversionRequest::new("scans", "scans"), &config).await?;
//!     println!("{} pages → {}", stats.page_count(), stats.output.display());
//!
//!     let report = run_batch("jobs.csv", &config).await?;
//!     eprintln!("{} ok, {} failed", report.succeeded(), report.failed());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `folder2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{parse_line, parse_records, run_batch, run_batch_sync, Record};
pub use config::{ConversionConfig, ConversionConfigBuilder, DecodePolicy, PageSize, SortOrder};
pub use convert::{convert_folder, convert_folder_sync, plan_folder};
pub use error::{BatchError, ErrorKind, ImageError, Img2PdfError, LineError};
pub use output::{BatchEntry, BatchReport, ConversionPlan, ConversionStats, EntryOutcome};
pub use pipeline::scan::{ImageFile, ImageFormat};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use request::ConversionRequest;
