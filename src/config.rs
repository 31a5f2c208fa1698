//! Configuration types for snapsort

use crate::naming::{FolderNaming, Locale};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How a file reaches its destination folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Copy files to destination, leaving sources in place
    #[default]
    Copy,
    /// Move files to destination
    Move,
}

/// Options for one batch run; immutable snapshot of user configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Source directories to scan for image files
    pub input_dirs: Vec<PathBuf>,

    /// Destination directory for organized files
    pub output_dir: PathBuf,

    /// Copy or move
    #[serde(default)]
    pub processing_mode: ProcessingMode,

    /// Create a day-level subfolder under each month
    #[serde(default = "default_true")]
    pub create_day_subfolders: bool,

    /// Skip files whose size and modification time match an already
    /// accepted file
    #[serde(default = "default_true")]
    pub deduplicate: bool,

    /// Numeric month folders or localized month names
    #[serde(default)]
    pub folder_naming: FolderNaming,

    /// Locale for localized month names and the no-date bucket
    #[serde(default)]
    pub locale: Locale,

    /// Files larger than this are counted as errors and never placed
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
}

fn default_true() -> bool {
    true
}

fn default_max_file_size() -> u64 {
    100 * 1024 * 1024
}

impl Default for Options {
    fn default() -> Self {
        Self {
            input_dirs: vec![],
            output_dir: PathBuf::new(),
            processing_mode: ProcessingMode::default(),
            create_day_subfolders: true,
            deduplicate: true,
            folder_naming: FolderNaming::default(),
            locale: Locale::default(),
            max_file_size_bytes: default_max_file_size(),
        }
    }
}

impl Options {
    /// Name of the destination root as it appears in built relative paths.
    pub fn output_root_name(&self) -> String {
        self.output_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output_dir.display().to_string())
    }

    /// Load options from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options: Options = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(options)
    }

    /// Save options to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError { source: e })?;

        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# snapsort configuration file
# This file uses TOML format (https://toml.io)

# Source directories to scan for image files
# Can specify multiple directories; the first occurrence of a duplicate
# (same size and modification time) across them wins
input_dirs = [
    "D:/Photos",
    "D:/Backup/Photos",
]

# Destination directory for organized files
output_dir = "D:/Sorted"

# Processing mode: "copy" or "move"
processing_mode = "copy"

# Create a day-level subfolder under each month
# - true:  2024/05_may/31/photo.jpg
# - false: 2024/05_may/photo.jpg
create_day_subfolders = true

# Skip files whose size and modification time match an already accepted file
deduplicate = true

# Folder naming: "numeric" or "localized-names"
# - numeric:          2024/05/
# - localized-names:  2024/05_may/ (month name follows the locale below)
folder_naming = "localized-names"

# Locale for month names and the no-date folder label
# One of: en, uk, ru, zh, es, pt, fr, de, ar, ja, ko, hi, it, nl, sv, pl
locale = "en"

# Files larger than this are counted as errors and never placed
# Default: 100MB = 104857600 bytes
max_file_size_bytes = 104857600
"#
        .to_string()
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to write configuration file
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to serialize configuration
    SerializeError { source: toml::ser::Error },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::WriteError { path, source } => {
                write!(f, "Failed to write config file '{}': {}", path.display(), source)
            }
            ConfigError::SerializeError { source } => {
                write!(f, "Failed to serialize config: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::WriteError { source, .. } => Some(source),
            ConfigError::SerializeError { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let options: Options = toml::from_str(&Options::sample_config()).unwrap();
        assert_eq!(options.input_dirs.len(), 2);
        assert_eq!(options.processing_mode, ProcessingMode::Copy);
        assert_eq!(options.locale, Locale::En);
        assert!(options.create_day_subfolders);
        assert_eq!(options.max_file_size_bytes, 104857600);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let options: Options = toml::from_str(
            r#"
input_dirs = ["/photos"]
output_dir = "/sorted"
"#,
        )
        .unwrap();
        assert!(options.deduplicate);
        assert!(options.create_day_subfolders);
        assert_eq!(options.folder_naming, FolderNaming::LocalizedNames);
        assert_eq!(options.processing_mode, ProcessingMode::Copy);
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut options = Options::default();
        options.input_dirs = vec![PathBuf::from("/in")];
        options.output_dir = PathBuf::from("/out/Photos");
        options.processing_mode = ProcessingMode::Move;
        options.locale = Locale::Uk;

        let text = toml::to_string_pretty(&options).unwrap();
        let back: Options = toml::from_str(&text).unwrap();
        assert_eq!(back.processing_mode, ProcessingMode::Move);
        assert_eq!(back.locale, Locale::Uk);
        assert_eq!(back.output_root_name(), "Photos");
    }
}
