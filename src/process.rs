//! Batch processor driving the organize pass
//!
//! Runs strictly sequentially: one file is fully enumerated, deduplicated,
//! metadata-read, date-resolved, and placed before the next one starts. The
//! destination tree and the duplicate detector both rely on that fixed
//! encounter order.
//!
//! A run moves through validation, enumeration, and the per-file loop, and
//! ends completed, cancelled, or failed. Configuration problems and an empty
//! enumeration are batch-fatal; anything that goes wrong with a single file
//! is counted and the batch continues.

use crate::config::Options;
use crate::date::{self, DateSource};
use crate::dedup::DuplicateDetector;
use crate::error::{Error, Result};
use crate::metadata::{MetadataSource, METADATA_PREFIX_BYTES};
use crate::naming;
use crate::place::FilePlacer;
use crate::scan::{FileDescriptor, SourceScanner};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared cooperative cancellation flag.
///
/// Sampled once per file boundary; an in-flight single-file operation is
/// never interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// File was placed at its destination
    Placed,
    /// File was skipped as a duplicate
    Skipped,
    /// File could not be processed; the batch continues
    Failed,
}

/// Progress event emitted after every processed, skipped, or errored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 1-based position of this file in the batch
    pub current: usize,
    pub total: usize,
    pub processed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub file_name: String,
    pub outcome: FileOutcome,
    /// Which timestamp decided the destination, when a date was resolved
    pub date_source: Option<DateSource>,
}

/// Terminal state of a run that got past enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// Final counts returned by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub total: usize,
    pub outcome: RunOutcome,
}

/// Sequential batch processor over injected collaborators.
pub struct BatchProcessor<S, M, P> {
    scanner: S,
    metadata: M,
    placer: P,
}

impl<S, M, P> BatchProcessor<S, M, P>
where
    S: SourceScanner,
    M: MetadataSource,
    P: FilePlacer,
{
    pub fn new(scanner: S, metadata: M, placer: P) -> Self {
        Self {
            scanner,
            metadata,
            placer,
        }
    }

    /// Run one batch over the configured sources.
    ///
    /// Returns the final counts, or an error for batch-fatal conditions
    /// (no sources, no destination, nothing to process, enumeration
    /// failure). Per-file failures only increment the error count.
    pub fn run<F>(
        &self,
        options: &Options,
        cancel: &CancelFlag,
        mut on_progress: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&ProgressEvent),
    {
        if options.input_dirs.is_empty() {
            return Err(Error::Config("no source folders selected".into()));
        }
        if options.output_dir.as_os_str().is_empty() {
            return Err(Error::Config("no destination folder selected".into()));
        }

        // Enumerate all roots up front, in selection order; traversal order
        // within a root is the scanner's stable order
        let mut files: Vec<FileDescriptor> = Vec::new();
        for root in &options.input_dirs {
            files.extend(self.scanner.list_image_files(root)?);
        }

        if files.is_empty() {
            return Err(Error::NoFilesFound);
        }

        let total = files.len();
        info!(total, "Starting batch");

        let root_name = options.output_root_name();
        let mut detector = DuplicateDetector::new(options.deduplicate);
        let mut processed = 0usize;
        let mut errors = 0usize;
        let mut skipped = 0usize;

        for (index, file) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(processed, errors, skipped, "Batch cancelled");
                return Ok(RunSummary {
                    processed,
                    errors,
                    skipped,
                    total,
                    outcome: RunOutcome::Cancelled,
                });
            }
            let current = index + 1;

            if detector.should_skip(file) {
                skipped += 1;
                debug!(name = %file.name, "Skipping duplicate");
                on_progress(&ProgressEvent {
                    current,
                    total,
                    processed,
                    errors,
                    skipped,
                    file_name: file.name.clone(),
                    outcome: FileOutcome::Skipped,
                    date_source: None,
                });
                continue;
            }

            if file.byte_size > options.max_file_size_bytes {
                errors += 1;
                warn!(
                    name = %file.name,
                    size = file.byte_size,
                    limit = options.max_file_size_bytes,
                    "File exceeds the size limit"
                );
                on_progress(&ProgressEvent {
                    current,
                    total,
                    processed,
                    errors,
                    skipped,
                    file_name: file.name.clone(),
                    outcome: FileOutcome::Failed,
                    date_source: None,
                });
                continue;
            }

            let prefix = match read_prefix(&file.path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    errors += 1;
                    error!(path = ?file.path, error = %e, "Failed to read file");
                    on_progress(&ProgressEvent {
                        current,
                        total,
                        processed,
                        errors,
                        skipped,
                        file_name: file.name.clone(),
                        outcome: FileOutcome::Failed,
                        date_source: None,
                    });
                    continue;
                }
            };

            // Adapter failures degrade to an all-absent record, so date
            // resolution always has the mtime fallback to land on
            let record = self.metadata.extract(&prefix);
            if let (Some(make), Some(model)) = (&record.camera_make, &record.camera_model) {
                debug!(name = %file.name, %make, %model, "Camera info");
            }

            let resolved = date::resolve(&record, file.last_modified_ms);
            let relative_path = naming::build_relative_path(
                Some(&resolved),
                options.folder_naming,
                options.create_day_subfolders,
                options.locale,
                &root_name,
            );

            match self
                .placer
                .place(file, &relative_path, options.processing_mode)
            {
                Ok(()) => {
                    detector.admit(file);
                    processed += 1;
                    info!(
                        name = %file.name,
                        destination = %relative_path,
                        date_source = ?resolved.source,
                        timestamp = %resolved.value,
                        "Processed file"
                    );
                    on_progress(&ProgressEvent {
                        current,
                        total,
                        processed,
                        errors,
                        skipped,
                        file_name: file.name.clone(),
                        outcome: FileOutcome::Placed,
                        date_source: Some(resolved.source),
                    });
                }
                Err(e) => {
                    // Not admitted: a failed copy must not hide a later
                    // identical file
                    errors += 1;
                    error!(name = %file.name, error = %e, "Failed to place file");
                    on_progress(&ProgressEvent {
                        current,
                        total,
                        processed,
                        errors,
                        skipped,
                        file_name: file.name.clone(),
                        outcome: FileOutcome::Failed,
                        date_source: Some(resolved.source),
                    });
                }
            }
        }

        info!(processed, errors, skipped, total, "Batch complete");
        Ok(RunSummary {
            processed,
            errors,
            skipped,
            total,
            outcome: RunOutcome::Completed,
        })
    }
}

/// Read at most the metadata prefix from a file.
fn read_prefix(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut bytes = Vec::with_capacity(METADATA_PREFIX_BYTES.min(8 * 1024));
    file.take(METADATA_PREFIX_BYTES as u64)
        .read_to_end(&mut bytes)?;
    Ok(bytes)
}
