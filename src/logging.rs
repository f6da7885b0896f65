//! Logger setup for one scraper invocation
//!
//! Terminal output goes to stderr so dry-run JSON on stdout stays clean.
//! The file log is appended to `{log_dir}/{county}.log`.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Install the terminal logger and, if the file opens, the file logger
pub fn initialize(log_dir: &Path, county: &str, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(file_logger) = create_file_logger(log_dir, county, level, config) {
        loggers.push(file_logger);
    }

    // Already initialized (tests, repeated calls) is fine
    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("deed_scraper")
        .build()
}

pub fn log_file_path(log_dir: &Path, county: &str) -> PathBuf {
    log_dir.join(format!("{}.log", county))
}

fn open_log_file(log_dir: &Path, county: &str) -> std::io::Result<File> {
    fs::create_dir_all(log_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(log_dir, county))
}

fn create_file_logger(
    log_dir: &Path,
    county: &str,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match open_log_file(log_dir, county) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!(
                "Warning: Could not open log file in {}: {}",
                log_dir.display(),
                err
            );
            None
        }
    }
}
