//! CLI argument parsing with clap

use crate::config::{Options, ProcessingMode};
use crate::naming::{FolderNaming, Locale};
use clap::Parser;
use std::path::PathBuf;

/// snapsort - sort photos into date-based folders
///
/// Groups image files from one or more source folders into a
/// year/month[/day] hierarchy at the destination, deriving each file's date
/// from EXIF metadata with the file modification time as fallback, and
/// skipping duplicates found across the sources.
#[derive(Parser, Debug)]
#[command(name = "snapsort")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Source directories to scan for image files
    #[arg(short, long, num_args = 1..)]
    pub input: Option<Vec<PathBuf>>,

    /// Destination directory for organized files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Copy or move files into the destination
    #[arg(short = 'M', long, value_enum)]
    pub mode: Option<ProcessingMode>,

    /// Folder naming scheme for month segments
    #[arg(short = 'F', long, value_enum)]
    pub folder_naming: Option<FolderNaming>,

    /// Locale for localized month names and the no-date folder
    /// (defaults to the system locale)
    #[arg(short = 'l', long, value_enum)]
    pub locale: Option<Locale>,

    /// Do not create day-level subfolders under each month
    #[arg(long)]
    pub no_day_subfolders: bool,

    /// Disable duplicate detection across source folders
    #[arg(long)]
    pub no_deduplicate: bool,

    /// Maximum file size in MB; larger files are counted as errors
    #[arg(long)]
    pub max_file_mb: Option<u64>,

    /// Write a sample configuration file to the given path and exit
    #[arg(long)]
    pub write_sample_config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Get config file name (without extension) for log naming
    pub fn config_name(&self) -> Option<String> {
        self.config.as_ref().and_then(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    /// Merge CLI arguments with options from a config file.
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_options(&self, mut options: Options) -> Options {
        if let Some(ref inputs) = self.input {
            options.input_dirs = inputs.clone();
        }
        if let Some(ref output) = self.output {
            options.output_dir = output.clone();
        }
        if let Some(mode) = self.mode {
            options.processing_mode = mode;
        }
        if let Some(folder_naming) = self.folder_naming {
            options.folder_naming = folder_naming;
        }
        if let Some(locale) = self.locale {
            options.locale = locale;
        }
        if self.no_day_subfolders {
            options.create_day_subfolders = false;
        }
        if self.no_deduplicate {
            options.deduplicate = false;
        }
        if let Some(max_file_mb) = self.max_file_mb {
            options.max_file_size_bytes = max_file_mb * 1024 * 1024;
        }

        options
    }

    /// Convert CLI arguments to Options (when no config file is used)
    pub fn to_options(&self) -> Options {
        let mut options = Options::default();
        options.locale = Locale::detect();
        self.merge_with_options(options)
    }
}
