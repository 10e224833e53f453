//! A single unit of work: one folder in, one PDF out.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One `(folder, output name)` pair.
///
/// Built from CLI flags in direct mode or from one CSV line in batch mode.
/// The output name is kept exactly as given; [`ConversionRequest::output_path`]
/// applies the `.pdf` suffix rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    folder_path: PathBuf,
    pdf_name: PathBuf,
}

impl ConversionRequest {
    pub fn new(folder_path: impl Into<PathBuf>, pdf_name: impl Into<PathBuf>) -> Self {
        Self {
            folder_path: folder_path.into(),
            pdf_name: pdf_name.into(),
        }
    }

    pub fn folder_path(&self) -> &Path {
        &self.folder_path
    }

    pub fn pdf_name(&self) -> &Path {
        &self.pdf_name
    }

    /// The file the PDF is written to.
    ///
    /// `.pdf` is appended unless the name already ends in a `pdf` extension
    /// (any case). The existing extension is never replaced:
    /// `report.v2` becomes `report.v2.pdf`.
    pub fn output_path(&self) -> PathBuf {
        with_pdf_suffix(&self.pdf_name)
    }

    /// Whether the output name ends in something that can become a file.
    pub fn has_output_file_name(&self) -> bool {
        is_file_name(&self.pdf_name)
    }
}

/// False for `""`, `.`, `..` and names ending in a path separator.
///
/// `Path::file_name` ignores a trailing separator (`dir/` yields `dir`), so
/// the raw text is checked as well.
pub fn is_file_name(name: &Path) -> bool {
    let trailing_separator = name
        .as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator);
    !trailing_separator && name.file_name().is_some_and(|n| !n.is_empty())
}

/// Append `.pdf` to `name` unless its extension already is `pdf` (case-insensitive).
pub fn with_pdf_suffix(name: &Path) -> PathBuf {
    let has_pdf_ext = name
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if has_pdf_ext {
        return name.to_path_buf();
    }

    let mut raw = OsString::from(name.as_os_str());
    raw.push(".pdf");
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_pdf_when_missing() {
        assert_eq!(with_pdf_suffix(Path::new("report")), PathBuf::from("report.pdf"));
        assert_eq!(
            with_pdf_suffix(Path::new("out/report1")),
            PathBuf::from("out/report1.pdf")
        );
    }

    #[test]
    fn keeps_existing_pdf_extension_any_case() {
        assert_eq!(with_pdf_suffix(Path::new("a.pdf")), PathBuf::from("a.pdf"));
        assert_eq!(with_pdf_suffix(Path::new("A.PDF")), PathBuf::from("A.PDF"));
        assert_eq!(with_pdf_suffix(Path::new("b.Pdf")), PathBuf::from("b.Pdf"));
    }

    #[test]
    fn other_extensions_are_kept_and_extended() {
        assert_eq!(
            with_pdf_suffix(Path::new("report.v2")),
            PathBuf::from("report.v2.pdf")
        );
        assert_eq!(
            with_pdf_suffix(Path::new("scan.png")),
            PathBuf::from("scan.png.pdf")
        );
    }

    #[test]
    fn output_names_without_a_file_name() {
        assert!(is_file_name(Path::new("report")));
        assert!(is_file_name(Path::new("out/report.pdf")));
        assert!(is_file_name(Path::new(".hidden")));

        assert!(!is_file_name(Path::new("")));
        assert!(!is_file_name(Path::new("outdir/")));
        assert!(!is_file_name(Path::new(".")));
        assert!(!is_file_name(Path::new("out/..")));
        assert!(!ConversionRequest::new("imgs", "").has_output_file_name());
    }

    #[test]
    fn request_exposes_fields_unchanged() {
        let r = ConversionRequest::new("imgs", "book");
        assert_eq!(r.folder_path(), Path::new("imgs"));
        assert_eq!(r.pdf_name(), Path::new("book"));
        assert_eq!(r.output_path(), PathBuf::from("book.pdf"));
    }
}
