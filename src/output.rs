//! Result types returned by the converter and the batch driver.

use crate::error::{ImageError, LineError};
use crate::pipeline::scan::ImageFile;
use crate::request::ConversionRequest;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of one successful folder conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Folder the images were read from.
    pub folder: PathBuf,
    /// PDF that was written (after the `.pdf` suffix rule).
    pub output: PathBuf,
    /// Images that matched the extension filter.
    pub candidate_images: usize,
    /// Files that became pages, in page order.
    pub pages: Vec<PathBuf>,
    /// Images left out because they failed to decode.
    pub skipped: Vec<ImageError>,
    /// Size of the written PDF.
    pub bytes_written: u64,
    pub decode_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl ConversionStats {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// What a conversion would do, without decoding or writing anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionPlan {
    pub folder: PathBuf,
    pub output: PathBuf,
    /// Candidate images in page order.
    pub images: Vec<ImageFile>,
}

/// Outcome of one non-blank CSV line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum EntryOutcome {
    Converted(ConversionStats),
    Failed(LineError),
}

/// One line of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// 1-indexed physical line in the CSV file.
    pub line_number: usize,
    /// The parsed request; None when the line was malformed.
    pub request: Option<ConversionRequest>,
    pub outcome: EntryOutcome,
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, EntryOutcome::Converted(_))
    }

    pub fn error(&self) -> Option<&LineError> {
        match &self.outcome {
            EntryOutcome::Failed(e) => Some(e),
            EntryOutcome::Converted(_) => None,
        }
    }
}

/// Result of a completed batch run. Entries are in CSV line order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub csv_path: PathBuf,
    pub entries: Vec<BatchEntry>,
    pub total_duration_ms: u64,
}

impl BatchReport {
    pub fn successes(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|e| e.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|e| !e.is_success())
    }

    pub fn succeeded(&self) -> usize {
        self.successes().count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.entries.iter().all(BatchEntry::is_success)
    }
}
