//! Error types for the folder2pdf library.
//!
//! Errors come in tiers that match the scope of the work that failed:
//!
//! * [`Img2PdfError`] — **Fatal** for one folder: the conversion cannot
//!   produce a PDF at all (missing folder, no images, unwritable output).
//!   Returned as `Err(Img2PdfError)` from the `convert_*` functions. No
//!   output file is created or touched when one of these is returned.
//!
//! * [`ImageError`] — **Non-fatal**: a single image could not be decoded
//!   but the remaining images are fine. Under [`crate::DecodePolicy::Skip`]
//!   these are collected in [`crate::ConversionStats::skipped`].
//!
//! * [`BatchError`] — **Fatal** for a whole batch: the CSV itself could not
//!   be read, so no line was attempted.
//!
//! * [`LineError`] — **Non-fatal** for a batch: one CSV line was malformed or
//!   its conversion failed. Stored in the [`crate::BatchReport`].
//!
//! [`ErrorKind`] flattens all of the above into one serialisable tag so
//! callers and reports can match on the category without the payload.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Category of a failure, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    FolderNotFound,
    NoImagesFound,
    ImageDecodeFailed,
    WriteFailed,
    CsvFileNotFound,
    CsvLineMalformed,
    InvalidConfig,
    Internal,
}

/// All fatal errors returned by a single folder conversion.
#[derive(Debug, Error)]
pub enum Img2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The folder does not exist or is not a directory.
    #[error("Image folder not found: '{path}'\nCheck the path exists and is a directory.")]
    FolderNotFound { path: PathBuf },

    /// The folder exists but its entries could not be listed.
    #[error("Cannot read image folder '{path}': {source}")]
    FolderUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The folder has no `.png`, `.jpg` or `.jpeg` files.
    #[error("No PNG/JPG/JPEG images found in '{path}'")]
    NoImagesFound { path: PathBuf },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// An image failed to decode and the policy is to abort.
    #[error("Failed to decode image '{file}': {detail}")]
    ImageDecodeFailed { file: PathBuf, detail: String },

    /// Every candidate image failed to decode; the PDF would be empty.
    #[error("All {total} images in '{folder}' failed to decode.\nFirst error: {first_error}")]
    AllImagesFailed {
        folder: PathBuf,
        total: usize,
        first_error: String,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output name has no file name to write to (empty, `.`, `..` or
    /// ending in a path separator).
    #[error("Invalid output name '{path}': expected a file name such as 'report.pdf'")]
    InvalidOutputName { path: PathBuf },

    /// lopdf could not serialise a page or the document.
    #[error("Failed to assemble PDF '{path}': {detail}")]
    PdfAssemblyFailed { path: PathBuf, detail: String },

    /// Could not create, write or rename the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Img2PdfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Img2PdfError::FolderNotFound { .. } | Img2PdfError::FolderUnreadable { .. } => {
                ErrorKind::FolderNotFound
            }
            Img2PdfError::NoImagesFound { .. } => ErrorKind::NoImagesFound,
            Img2PdfError::ImageDecodeFailed { .. } | Img2PdfError::AllImagesFailed { .. } => {
                ErrorKind::ImageDecodeFailed
            }
            Img2PdfError::InvalidOutputName { .. }
            | Img2PdfError::PdfAssemblyFailed { .. }
            | Img2PdfError::WriteFailed { .. } => ErrorKind::WriteFailed,
            Img2PdfError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Img2PdfError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// A non-fatal error for a single image.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum ImageError {
    /// The file could not be opened or read.
    #[error("{file}: read failed: {detail}")]
    ReadFailed { file: PathBuf, detail: String },

    /// The bytes were read but are not a decodable PNG/JPEG.
    #[error("{file}: decode failed: {detail}")]
    DecodeFailed { file: PathBuf, detail: String },
}

impl ImageError {
    pub fn file(&self) -> &PathBuf {
        match self {
            ImageError::ReadFailed { file, .. } | ImageError::DecodeFailed { file, .. } => file,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ImageError::ReadFailed { detail, .. } | ImageError::DecodeFailed { detail, .. } => {
                detail
            }
        }
    }
}

impl From<ImageError> for Img2PdfError {
    fn from(e: ImageError) -> Self {
        Img2PdfError::ImageDecodeFailed {
            file: e.file().clone(),
            detail: e.detail().to_string(),
        }
    }
}

/// Fatal errors for a whole batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The CSV file is missing or unreadable; no line was processed.
    #[error("CSV file '{path}' could not be read: {source}")]
    CsvFileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error (e.g. a panicked worker).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BatchError::CsvFileNotFound { .. } => ErrorKind::CsvFileNotFound,
            BatchError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// A non-fatal failure of one CSV line.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LineError {
    /// The line is not a `folder_path;pdf_name` record.
    #[error("line {line_number}: malformed record: {reason}")]
    Malformed { line_number: usize, reason: String },

    /// The record parsed but its conversion failed.
    #[error("line {line_number}: {detail}")]
    ConversionFailed {
        line_number: usize,
        kind: ErrorKind,
        detail: String,
    },
}

impl LineError {
    pub fn line_number(&self) -> usize {
        match self {
            LineError::Malformed { line_number, .. }
            | LineError::ConversionFailed { line_number, .. } => *line_number,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LineError::Malformed { .. } => ErrorKind::CsvLineMalformed,
            LineError::ConversionFailed { kind, .. } => *kind,
        }
    }

    pub(crate) fn conversion(line_number: usize, err: &Img2PdfError) -> Self {
        LineError::ConversionFailed {
            line_number,
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}
