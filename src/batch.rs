//! Batch Driver: convert every `folder_path;pdf_name` line of a CSV file.
//!
//! ## Format
//!
//! ```text
//! scans/2024-01;reports/january
//! scans/2024-02 ; reports/february.pdf
//! ```
//!
//! One record per line, two fields separated by `;`, no header, no quoting.
//! Fields are trimmed. Blank lines are ignored. Relative paths are resolved
//! against the working directory of the process.
//!
//! A bad line never stops the batch: it becomes a failed [`BatchEntry`] and
//! the next line runs. Only an unreadable CSV file aborts, before any
//! conversion has started.

use crate::config::ConversionConfig;
use crate::convert::convert_folder;
use crate::error::{BatchError, LineError};
use crate::output::{BatchEntry, BatchReport, EntryOutcome};
use crate::request::ConversionRequest;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Field separator of a batch record.
pub const SEPARATOR: char = ';';

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// A non-blank CSV line and what it parsed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-indexed physical line number.
    pub line_number: usize,
    pub parsed: Result<ConversionRequest, LineError>,
}

/// Parse one record. `line_number` is only used for error reporting.
pub fn parse_line(line_number: usize, line: &str) -> Result<ConversionRequest, LineError> {
    let malformed = |reason: String| LineError::Malformed {
        line_number,
        reason,
    };

    let fields: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();
    let [folder, pdf_name] = fields.as_slice() else {
        return Err(malformed(format!(
            "expected 2 fields separated by '{SEPARATOR}', found {}",
            fields.len()
        )));
    };

    if folder.is_empty() {
        return Err(malformed("empty folder path".into()));
    }
    if pdf_name.is_empty() {
        return Err(malformed("empty pdf name".into()));
    }

    Ok(ConversionRequest::new(*folder, *pdf_name))
}

/// Split raw CSV bytes into records, skipping blank lines.
///
/// Accepts `\n` and `\r\n` line endings and a leading UTF-8 BOM. Each line
/// is decoded on its own, so a line that is not valid UTF-8 becomes a
/// malformed record without affecting its neighbours.
pub fn parse_records(content: &[u8]) -> Vec<Record> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    content
        .split(|&b| b == b'\n')
        .enumerate()
        .filter_map(|(idx, raw)| {
            let line_number = idx + 1;
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let parsed = match std::str::from_utf8(raw) {
                Ok(line) if line.trim().is_empty() => return None,
                Ok(line) => parse_line(line_number, line),
                Err(e) => Err(LineError::Malformed {
                    line_number,
                    reason: format!("invalid UTF-8 at byte {}", e.valid_up_to()),
                }),
            };
            Some(Record {
                line_number,
                parsed,
            })
        })
        .collect()
}

/// Run every record of `csv_path` through the Folder Converter.
///
/// Lines are processed in file order; with `config.batch_concurrency > 1`
/// up to that many run at once. The report lists entries in line order in
/// both cases.
///
/// # Errors
/// Returns `Err(BatchError::CsvFileNotFound)` if the CSV cannot be read.
/// Per-line failures are reported in the returned [`BatchReport`].
pub async fn run_batch(
    csv_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchReport, BatchError> {
    let total_start = Instant::now();
    let csv_path = csv_path.as_ref();

    let content = tokio::fs::read(csv_path)
        .await
        .map_err(|source| BatchError::CsvFileNotFound {
            path: csv_path.to_path_buf(),
            source,
        })?;

    let records = parse_records(&content);
    info!(
        "Batch {}: {} records, concurrency {}",
        csv_path.display(),
        records.len(),
        config.batch_concurrency
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(records.len());
    }

    let entries: Vec<BatchEntry> = stream::iter(records)
        .map(|record| run_record(record, config))
        .buffered(config.batch_concurrency.max(1))
        .collect()
        .await;

    let report = BatchReport {
        csv_path: csv_path.to_path_buf(),
        entries,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {} succeeded, {} failed, {}ms",
        report.succeeded(),
        report.failed(),
        report.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(report.succeeded(), report.failed());
    }

    Ok(report)
}

/// Synchronous wrapper around [`run_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_batch_sync(
    csv_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchReport, BatchError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BatchError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(run_batch(csv_path, config))
}

async fn run_record(record: Record, config: &ConversionConfig) -> BatchEntry {
    let Record {
        line_number,
        parsed,
    } = record;

    let entry = match parsed {
        Err(e) => {
            warn!("Skipping {}", e);
            BatchEntry {
                line_number,
                request: None,
                outcome: EntryOutcome::Failed(e),
            }
        }
        Ok(request) => {
            let outcome = match convert_folder(&request, config).await {
                Ok(stats) => EntryOutcome::Converted(stats),
                Err(e) => {
                    warn!("Line {} failed: {}", line_number, e);
                    EntryOutcome::Failed(LineError::conversion(line_number, &e))
                }
            };
            BatchEntry {
                line_number,
                request: Some(request),
                outcome,
            }
        }
    };

    if let Some(ref cb) = config.progress_callback {
        let error = entry.error().map(|e| e.to_string());
        cb.on_line_complete(line_number, error.as_deref());
    }

    entry
}
