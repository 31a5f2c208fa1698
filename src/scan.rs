//! Source folder enumeration
//!
//! Walks each selected source root recursively and yields a descriptor for
//! every supported image file, in a stable order so duplicate detection is
//! reproducible across runs.

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Image and RAW formats the organizer accepts, matched case-insensitively
/// against the substring after the last `.` in a file name.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "tiff", "tif", "heic", "webp", "bmp", "gif", "cr2", "nef", "arw", "dng",
];

/// One discovered source file; read-only after enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Full path to the source file
    pub path: PathBuf,
    /// File name including extension
    pub name: String,
    pub byte_size: u64,
    /// Modification time in epoch milliseconds
    pub last_modified_ms: i64,
    /// Which selected source root this file came from
    pub source_root_id: String,
}

/// Check whether a file name carries a supported image extension.
pub fn is_supported_image(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|e| *e == ext)
        }
        None => false,
    }
}

/// Source enumeration collaborator, injected into the batch processor.
pub trait SourceScanner {
    /// List all supported image files under one source root, recursively,
    /// in a stable traversal order.
    fn list_image_files(&self, root: &Path) -> Result<Vec<FileDescriptor>>;
}

/// Walkdir-backed scanner used in production.
#[derive(Debug, Default)]
pub struct WalkdirScanner;

impl SourceScanner for WalkdirScanner {
    fn list_image_files(&self, root: &Path) -> Result<Vec<FileDescriptor>> {
        let root_id = root.display().to_string();
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !is_supported_image(name) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!(?path, error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            files.push(FileDescriptor {
                path: path.to_path_buf(),
                name: name.to_string(),
                byte_size: metadata.len(),
                last_modified_ms: metadata
                    .modified()
                    .map(system_time_ms)
                    .unwrap_or_default(),
                source_root_id: root_id.clone(),
            });
        }

        debug!(root = %root_id, count = files.len(), "Enumerated source root");
        Ok(files)
    }
}

fn system_time_ms(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_millis() as i64,
        Err(e) => -(e.duration().as_millis() as i64),
    }
}
