//! Duplicate detection across source folders
//!
//! Identity is the pair (byte size, modification time), encoded as a string
//! key. Deliberately coarse: it cheaply catches the same photo present under
//! several names across synced folders, at the cost of missing byte-identical
//! files whose timestamps differ. Content is never hashed.

use crate::scan::FileDescriptor;
use std::collections::HashSet;

/// First-wins duplicate detector, scoped to a single batch run.
///
/// `admit` must be called only for files that were actually placed, so a
/// failed copy never poisons detection of a later identical file.
#[derive(Debug)]
pub struct DuplicateDetector {
    enabled: bool,
    seen: HashSet<String>,
}

impl DuplicateDetector {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            seen: HashSet::new(),
        }
    }

    /// Identity key of a file: same size + same mtime means duplicate,
    /// regardless of name or source root.
    pub fn key(file: &FileDescriptor) -> String {
        format!("{}_{}", file.byte_size, file.last_modified_ms)
    }

    /// Whether this file duplicates one already admitted in encounter order.
    ///
    /// Always false when deduplication is disabled.
    pub fn should_skip(&self, file: &FileDescriptor) -> bool {
        self.enabled && self.seen.contains(&Self::key(file))
    }

    /// Record an accepted file. No-op when deduplication is disabled.
    pub fn admit(&mut self, file: &FileDescriptor) {
        if self.enabled {
            self.seen.insert(Self::key(file));
        }
    }
}
