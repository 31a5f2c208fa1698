//! Copy/move placement of files into the destination tree
//!
//! The placer owns directory creation and the actual byte transfer. From the
//! batch processor's point of view a placement either fully succeeds or
//! fails as a unit; no partially-written destination is reported as success.

use crate::config::ProcessingMode;
use crate::error::{Error, Result};
use crate::scan::FileDescriptor;
use filetime::FileTime;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const COPY_BUFFER_SIZE: usize = 256 * 1024;

/// Placement collaborator, injected into the batch processor.
pub trait FilePlacer {
    /// Place one file at the given relative destination path.
    ///
    /// The relative path starts with the output root name, as produced by
    /// the path builder. Intermediate directories are created on demand;
    /// pre-existing directories are tolerated silently.
    fn place(&self, file: &FileDescriptor, relative_path: &str, mode: ProcessingMode)
        -> Result<()>;
}

/// Filesystem-backed placer used in production.
#[derive(Debug)]
pub struct FsPlacer {
    destination: PathBuf,
    root_name: String,
}

impl FsPlacer {
    pub fn new(destination: &Path) -> Self {
        let root_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            destination: destination.to_path_buf(),
            root_name,
        }
    }

    /// Map a built relative path onto the destination directory, dropping
    /// the leading output-root segment the path builder includes.
    fn target_dir(&self, relative_path: &str) -> PathBuf {
        let mut dir = self.destination.clone();
        let mut segments = relative_path.split('/').filter(|s| !s.is_empty());
        let mut first = segments.next();
        if first == Some(self.root_name.as_str()) {
            first = None;
        }
        for segment in first.into_iter().chain(segments) {
            dir.push(segment);
        }
        dir
    }

    fn execute(
        &self,
        file: &FileDescriptor,
        target_dir: &Path,
        mode: ProcessingMode,
    ) -> std::io::Result<()> {
        fs::create_dir_all(target_dir)?;
        let dest = target_dir.join(&file.name);

        match mode {
            ProcessingMode::Copy => {
                copy_file(&file.path, &dest)?;
            }
            ProcessingMode::Move => {
                // Rename is faster on the same filesystem; fall back to
                // copy + delete across filesystems
                if fs::rename(&file.path, &dest).is_err() {
                    copy_file(&file.path, &dest)?;
                    fs::remove_file(&file.path)?;
                }
            }
        }

        // Keep the original modification time on the placed file
        let mtime = FileTime::from_unix_time(
            file.last_modified_ms.div_euclid(1000),
            (file.last_modified_ms.rem_euclid(1000) * 1_000_000) as u32,
        );
        let _ = filetime::set_file_mtime(&dest, mtime);

        debug!(source = ?file.path, ?dest, "Placed file");
        Ok(())
    }
}

impl FilePlacer for FsPlacer {
    fn place(
        &self,
        file: &FileDescriptor,
        relative_path: &str,
        mode: ProcessingMode,
    ) -> Result<()> {
        let target_dir = self.target_dir(relative_path);
        self.execute(file, &target_dir, mode)
            .map_err(|e| Error::Placement {
                path: file.path.clone(),
                destination: target_dir.display().to_string(),
                message: e.to_string(),
            })
    }
}

/// Copy file with buffered I/O
fn copy_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create(dest)?;

    let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, src_file);
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, dest_file);

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn descriptor(path: &Path) -> FileDescriptor {
        let metadata = fs::metadata(path).unwrap();
        FileDescriptor {
            path: path.to_path_buf(),
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            byte_size: metadata.len(),
            last_modified_ms: 1_700_000_123_456,
            source_root_id: "test".into(),
        }
    }

    #[test]
    fn test_copy_creates_nested_directories_and_keeps_source() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("IMG_1.jpg");
        fs::write(&source, b"pixels").unwrap();
        let out = dir.path().join("Out");

        let placer = FsPlacer::new(&out);
        placer
            .place(&descriptor(&source), "Out/2024/05/31", ProcessingMode::Copy)
            .unwrap();

        let dest = out.join("2024/05/31/IMG_1.jpg");
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
        assert!(source.exists());
    }

    #[test]
    fn test_move_removes_the_source() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("IMG_2.jpg");
        fs::write(&source, b"pixels").unwrap();
        let out = dir.path().join("Out");

        let placer = FsPlacer::new(&out);
        placer
            .place(&descriptor(&source), "Out/2023/01", ProcessingMode::Move)
            .unwrap();

        assert!(out.join("2023/01/IMG_2.jpg").exists());
        assert!(!source.exists());
    }

    #[test]
    fn test_pre_existing_directories_are_tolerated() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("Out");
        fs::create_dir_all(out.join("2024/05")).unwrap();

        let source = dir.path().join("IMG_3.jpg");
        fs::write(&source, b"pixels").unwrap();

        let placer = FsPlacer::new(&out);
        placer
            .place(&descriptor(&source), "Out/2024/05", ProcessingMode::Copy)
            .unwrap();
        assert!(out.join("2024/05/IMG_3.jpg").exists());
    }

    #[test]
    fn test_missing_source_reports_placement_error() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("gone.jpg");
        fs::write(&source, b"x").unwrap();
        let file = descriptor(&source);
        fs::remove_file(&source).unwrap();

        let placer = FsPlacer::new(&dir.path().join("Out"));
        let err = placer
            .place(&file, "Out/2024/01", ProcessingMode::Copy)
            .unwrap_err();
        assert!(matches!(err, Error::Placement { .. }));
    }

    #[test]
    fn test_no_date_bucket_path_maps_under_destination() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("IMG_4.jpg");
        fs::write(&source, b"pixels").unwrap();
        let out = dir.path().join("Out");

        let placer = FsPlacer::new(&out);
        placer
            .place(&descriptor(&source), "Out/No Date", ProcessingMode::Copy)
            .unwrap();
        assert!(out.join("No Date/IMG_4.jpg").exists());
    }
}
