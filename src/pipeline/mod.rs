//! Pipeline stages for folder-to-PDF conversion.
//!
//! Each submodule implements exactly one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ decode ──▶ layout ──▶ assemble ──▶ write
//! (list)   (image)    (points)   (lopdf)      (tmp + rename)
//! ```
//!
//! 1. [`scan`]     — list the folder, keep PNG/JPG/JPEG names, fix page order
//! 2. [`decode`]   — decode each file and deflate its samples
//! 3. [`layout`]   — page box and placement for the image's pixel size
//! 4. [`assemble`] — build the PDF object graph in memory
//! 5. [`write`]    — replace the target file atomically
//!
//! Nothing touches the output path before step 5, so every failure in
//! steps 1–4 leaves the file system as it was.

pub mod assemble;
pub mod decode;
pub mod layout;
pub mod scan;
pub mod write;
