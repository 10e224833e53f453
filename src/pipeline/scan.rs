//! Folder scanning: find candidate images and fix their page order.
//!
//! Format detection looks only at the file name. Whether the bytes really
//! are a PNG or JPEG is the decoder's business; keeping the two apart lets
//! the listing and ordering rules be tested without any image data.

use crate::config::SortOrder;
use crate::error::Img2PdfError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Image format implied by a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpg,
    Jpeg,
    Unsupported,
}

impl ImageFormat {
    /// Map a file name to a format by its extension, ignoring case.
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return ImageFormat::Unsupported;
        };
        match ext.to_ascii_lowercase().as_str() {
            "png" => ImageFormat::Png,
            "jpg" => ImageFormat::Jpg,
            "jpeg" => ImageFormat::Jpeg,
            _ => ImageFormat::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ImageFormat::Unsupported)
    }
}

/// A candidate image found in the folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    pub path: PathBuf,
    pub format: ImageFormat,
}

impl ImageFile {
    pub fn file_name(&self) -> &std::ffi::OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }
}

/// List the candidate images of `folder` (non-recursive) in page order.
///
/// Returns an empty vector when nothing matches; the caller decides whether
/// that is an error.
pub fn list_images(folder: &Path, order: SortOrder) -> Result<Vec<ImageFile>, Img2PdfError> {
    match std::fs::metadata(folder) {
        Ok(meta) if meta.is_dir() => {}
        _ => {
            return Err(Img2PdfError::FolderNotFound {
                path: folder.to_path_buf(),
            })
        }
    }

    let unreadable = |source| Img2PdfError::FolderUnreadable {
        path: folder.to_path_buf(),
        source,
    };

    let mut images = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();

        // is_file follows symlinks; directories named `x.png` are ignored.
        if !path.is_file() {
            continue;
        }

        let format = ImageFormat::from_path(&path);
        if format.is_supported() {
            images.push(ImageFile { path, format });
        } else {
            debug!("Ignoring non-image entry: {}", path.display());
        }
    }

    sort_images(&mut images, order);
    debug!(
        "Found {} candidate images in {}",
        images.len(),
        folder.display()
    );
    Ok(images)
}

/// Sort images into page order. The result is a total order on file names,
/// so the same folder contents always give the same sequence.
pub fn sort_images(images: &mut [ImageFile], order: SortOrder) {
    match order {
        SortOrder::Lexicographic => images.sort_by(|a, b| a.file_name().cmp(b.file_name())),
        SortOrder::Natural => images.sort_by(|a, b| {
            let (na, nb) = (a.file_name(), b.file_name());
            natural_cmp(&na.to_string_lossy(), &nb.to_string_lossy()).then_with(|| na.cmp(nb))
        }),
    }
}

/// Compare two names treating each run of ASCII digits as one number.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let da = take_digits(&mut ai);
                let db = take_digits(&mut bi);
                let (ta, tb) = (da.trim_start_matches('0'), db.trim_start_matches('0'));
                let ord = ta.len().cmp(&tb.len()).then_with(|| ta.cmp(tb));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = it.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        it.next();
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<ImageFile> {
        names
            .iter()
            .map(|n| ImageFile {
                path: PathBuf::from("imgs").join(n),
                format: ImageFormat::from_path(Path::new(n)),
            })
            .collect()
    }

    fn names(images: &[ImageFile]) -> Vec<String> {
        images
            .iter()
            .map(|i| i.file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn detects_formats_case_insensitively() {
        assert_eq!(ImageFormat::from_path(Path::new("a.png")), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path(Path::new("a.PNG")), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path(Path::new("b.JpG")), ImageFormat::Jpg);
        assert_eq!(ImageFormat::from_path(Path::new("c.jpeg")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("c.JPEG")), ImageFormat::Jpeg);
    }

    #[test]
    fn rejects_other_names() {
        for name in ["a.gif", "a.webp", "notes.txt", "png", "a.png.bak", ".png", "a"] {
            assert!(
                !ImageFormat::from_path(Path::new(name)).is_supported(),
                "{name} should be unsupported"
            );
        }
    }

    #[test]
    fn lexicographic_order_example() {
        let mut imgs = files(&["c.jpg", "a.png", "b.jpeg"]);
        sort_images(&mut imgs, SortOrder::Lexicographic);
        assert_eq!(names(&imgs), ["a.png", "b.jpeg", "c.jpg"]);
    }

    #[test]
    fn lexicographic_order_is_case_sensitive() {
        let mut imgs = files(&["a.png", "B.png", "c.png"]);
        sort_images(&mut imgs, SortOrder::Lexicographic);
        assert_eq!(names(&imgs), ["B.png", "a.png", "c.png"]);
    }

    #[test]
    fn lexicographic_puts_ten_before_two() {
        let mut imgs = files(&["pag_2.jpg", "pag_10.jpg", "pag_1.jpg"]);
        sort_images(&mut imgs, SortOrder::Lexicographic);
        assert_eq!(names(&imgs), ["pag_1.jpg", "pag_10.jpg", "pag_2.jpg"]);
    }

    #[test]
    fn natural_order_compares_numbers() {
        let mut imgs = files(&["pag_2.jpg", "pag_10.jpg", "pag_1.jpg", "pag_01.jpg"]);
        sort_images(&mut imgs, SortOrder::Natural);
        assert_eq!(
            names(&imgs),
            ["pag_01.jpg", "pag_1.jpg", "pag_2.jpg", "pag_10.jpg"]
        );
    }

    #[test]
    fn natural_cmp_basics() {
        assert_eq!(natural_cmp("a2", "a10"), Ordering::Less);
        assert_eq!(natural_cmp("a10", "a2"), Ordering::Greater);
        assert_eq!(natural_cmp("a", "a1"), Ordering::Less);
        assert_eq!(natural_cmp("007", "7"), Ordering::Equal);
        assert_eq!(natural_cmp("b1", "a9"), Ordering::Greater);
        assert_eq!(natural_cmp("", ""), Ordering::Equal);
    }

    #[test]
    fn missing_folder_is_folder_not_found() {
        let err = list_images(Path::new("/definitely/not/here"), SortOrder::Lexicographic)
            .unwrap_err();
        assert!(matches!(err, Img2PdfError::FolderNotFound { .. }));
    }

    #[test]
    fn file_instead_of_folder_is_folder_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.png");
        std::fs::write(&file, b"x").unwrap();
        let err = list_images(&file, SortOrder::Lexicographic).unwrap_err();
        assert!(matches!(err, Img2PdfError::FolderNotFound { .. }));
    }

    #[test]
    fn lists_only_matching_files_non_recursively() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.JPG", "a.png", "notes.txt", "c.jpeg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("d.png")).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("e.png"), b"x").unwrap();

        let imgs = list_images(dir.path(), SortOrder::Lexicographic).unwrap();
        assert_eq!(names(&imgs), ["a.png", "b.JPG", "c.jpeg"]);
        assert_eq!(imgs[1].format, ImageFormat::Jpg);
    }

    #[test]
    fn empty_folder_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_images(dir.path(), SortOrder::Natural)
            .unwrap()
            .is_empty());
    }
}
