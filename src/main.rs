//! snapsort - photo organization by date
//!
//! A CLI tool that groups image files into a date-based folder hierarchy,
//! resolving each file's date from EXIF metadata with the file modification
//! time as fallback, and deduplicating across source folders.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use snapsort::process::{FileOutcome, ProgressEvent, RunOutcome};
use snapsort::{
    BatchProcessor, CancelFlag, Cli, ExifMetadataSource, FsPlacer, Options, WalkdirScanner,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// CLI output module
mod cli_output {
    //! Unified colors and formatting for command line output.

    use crossterm::{
        style::{style, Color, Print, Stylize},
        ExecutableCommand,
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(&format!("{}\n", "─".repeat(60))));
    }

    pub fn print_title(title: &str) {
        let width = 60usize;
        let padding = (width.saturating_sub(title.len())) / 2;
        let left_pad = " ".repeat(padding.saturating_sub(1));

        let _ = stdout().execute(Print(&format!(
            "{}{}\n\n",
            left_pad,
            title.bold().stylize()
        )));
    }

    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_error(msg: &str) {
        let _ = stdout().execute(Print(style("✗ ").with(CliTheme::ERROR).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// Print a statistics line
    pub fn print_stat(key: &str, value: &str, color: Color) {
        let key_styled = style(key).with(CliTheme::HINT);
        let value_styled = style(value).with(color).bold();
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(key_styled));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(value_styled));
        let _ = stdout().execute(Print("\n"));
    }

    /// Print a per-file result line
    pub fn print_result(status_icon: &str, status_color: Color, file: &str, msg: &str) {
        let icon_styled = style(status_icon).with(status_color).bold();
        let file_styled = style(file).italic();
        let msg_styled = style(msg).with(CliTheme::HINT);

        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(icon_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(file_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(msg_styled));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_log_path(path: &str) {
        let _ = stdout().execute(Print("\n"));
        let _ = stdout().execute(Print(style("  Log file: ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", path)));
    }

    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Sample config generation needs no logging or validation
    if let Some(ref path) = cli.write_sample_config {
        std::fs::write(path, Options::sample_config())?;
        println!("Sample configuration written to {}", path.display());
        return Ok(());
    }

    let exe_dir = get_executable_dir()?;
    let log_path = get_log_path(&exe_dir, &cli);
    let _guard = setup_logging(&cli, &log_path)?;

    info!(version = env!("CARGO_PKG_VERSION"), "snapsort starting");

    let options = load_options(&cli, &exe_dir)?;
    if cli.verbose {
        info!(?options, "Options loaded");
    }
    info!(log_file = %log_path.display(), "Log file location");

    validate_options(&options)?;

    // Ctrl-C flips the cooperative flag; the batch stops at the next file
    // boundary with partial counts intact
    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel())?;
    }

    let processor = BatchProcessor::new(
        WalkdirScanner,
        ExifMetadataSource,
        FsPlacer::new(&options.output_dir),
    );

    let verbose = cli.verbose;
    let result = processor.run(&options, &cancel, |event| {
        if verbose {
            print_file_event(event);
        }
    });

    match result {
        Ok(summary) => {
            use cli_output::*;

            print_separator();
            print_title("Processing complete");
            print_separator();

            print_blank();
            print_stat("Processed", &summary.processed.to_string(), CliTheme::SUCCESS);
            print_stat("Skipped", &summary.skipped.to_string(), CliTheme::WARNING);
            print_stat("Errors", &summary.errors.to_string(), CliTheme::ERROR);
            print_stat("Total", &summary.total.to_string(), CliTheme::ACCENT);
            print_blank();

            if summary.outcome == RunOutcome::Cancelled {
                print_warning("Run was cancelled; the counts above cover the files handled before the stop.");
            }

            print_separator();
            print_log_path(&log_path.display().to_string());

            info!(
                processed = summary.processed,
                skipped = summary.skipped,
                errors = summary.errors,
                total = summary.total,
                outcome = ?summary.outcome,
                "Run finished"
            );

            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Processing failed");
            cli_output::print_error(&format!("Error: {}", e));
            std::process::exit(1);
        }
    }
}

fn print_file_event(event: &ProgressEvent) {
    use cli_output::*;

    let position = format!("[{}/{}]", event.current, event.total);
    match event.outcome {
        FileOutcome::Placed => {
            let source = event
                .date_source
                .map(|s| format!("{:?}", s))
                .unwrap_or_default();
            print_result("✓", CliTheme::SUCCESS, &event.file_name, &format!("{} {}", position, source));
        }
        FileOutcome::Skipped => {
            print_result("⊘", CliTheme::WARNING, &event.file_name, &format!("{} duplicate", position));
        }
        FileOutcome::Failed => {
            print_result("✗", CliTheme::ERROR, &event.file_name, &position);
        }
    }
}

/// Get the directory where the executable is located
fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Determine the log file path based on config file or timestamp
fn get_log_path(exe_dir: &Path, cli: &Cli) -> PathBuf {
    let log_dir = exe_dir.join("Log");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    if let Some(config_name) = cli.config_name() {
        let config_log_dir = log_dir.join(&config_name);
        let log_filename = format!("{}_{}.log", config_name, timestamp);
        config_log_dir.join(log_filename)
    } else {
        let log_filename = format!("Run_{}.log", timestamp);
        log_dir.join(log_filename)
    }
}

/// Resolve config path - supports shorthand syntax
fn resolve_config_path(exe_dir: &Path, config_path: &Path) -> PathBuf {
    if config_path.exists() {
        return config_path.to_path_buf();
    }

    let with_extension = if config_path.extension().is_none() {
        config_path.with_extension("toml")
    } else {
        config_path.to_path_buf()
    };

    if with_extension.exists() {
        return with_extension;
    }

    let config_dir = exe_dir.join("Config");
    let filename = config_path.file_name().unwrap_or(config_path.as_os_str());

    let mut in_config_dir = config_dir.join(filename);
    if in_config_dir.extension().is_none() {
        in_config_dir = in_config_dir.with_extension("toml");
    }

    if in_config_dir.exists() {
        return in_config_dir;
    }

    config_path.to_path_buf()
}

/// Load options from file or CLI arguments
fn load_options(cli: &Cli, exe_dir: &Path) -> Result<Options> {
    let options = if let Some(ref config_path) = cli.config {
        let resolved_path = resolve_config_path(exe_dir, config_path);
        info!(config_file = %resolved_path.display(), "Loading configuration from file");
        let file_options = Options::load_from_file(&resolved_path)?;
        cli.merge_with_options(file_options)
    } else {
        cli.to_options()
    };

    Ok(options)
}

/// Setup logging (file + console)
fn setup_logging(cli: &Cli, log_path: &Path) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(Some(guard))
}

/// Validate options before processing
fn validate_options(options: &Options) -> Result<()> {
    if options.input_dirs.is_empty() {
        anyhow::bail!("No source folders selected; pass --input or a config file");
    }
    if options.output_dir.as_os_str().is_empty() {
        anyhow::bail!("No destination folder selected; pass --output or a config file");
    }

    for input_dir in &options.input_dirs {
        if !input_dir.exists() {
            cli_output::print_warning(&format!(
                "Source folder does not exist: {}",
                input_dir.display()
            ));
        }
    }

    // Sorting a folder into itself would re-enumerate placed files
    for input_dir in &options.input_dirs {
        if options.output_dir.starts_with(input_dir) {
            anyhow::bail!(
                "Destination {} is inside source folder {}",
                options.output_dir.display(),
                input_dir.display()
            );
        }
    }

    // An unwritable destination fails the run before any file-level work
    std::fs::create_dir_all(&options.output_dir).map_err(|e| {
        anyhow::anyhow!(
            "Destination folder {} is not writable: {}",
            options.output_dir.display(),
            e
        )
    })?;

    Ok(())
}
