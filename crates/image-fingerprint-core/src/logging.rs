use log::{error, info, LevelFilter};
use std::path::Path;

// For file-based logging with rotation
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::{Error, Result};

/// Environment variable overriding the file log level
pub const LOG_ENV_VAR: &str = "FINGERPRINT_LOG";

/// Size at which the log file is rotated
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;

/// Number of archived log files kept
const ARCHIVE_COUNT: u32 = 5;

/// Initialize the logger with timestamp, log level, and module path.
/// Logs are written to a rotating file so they do not interfere with progress bars.
pub fn init_logger(log_dir: &Path, level: LevelFilter) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let log_file_path = log_dir.join("fingerprint.log");
    let archived_logs_pattern = format!("{}/fingerprint.{{}}.log", log_dir.display());

    let file_trigger = SizeTrigger::new(ROTATE_AT_BYTES);

    let file_roller = FixedWindowRoller::builder()
        .build(&archived_logs_pattern, ARCHIVE_COUNT)
        .map_err(|e| Error::Configuration(format!("Failed to create log roller: {}", e)))?;

    let compound_policy = CompoundPolicy::new(Box::new(file_trigger), Box::new(file_roller));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(&log_file_path, Box::new(compound_policy))?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(rolling_file)))
        .build(Root::builder().appender("file").build(LevelFilter::Trace))
        .map_err(|e| Error::Configuration(format!("Failed to build log config: {}", e)))?;

    log4rs::init_config(config)
        .map_err(|e| Error::Configuration(format!("Failed to initialize log4rs: {}", e)))?;

    log::set_max_level(level_from_env().unwrap_or(level));

    info!("Image fingerprinting started");
    info!("Logging to file: {}", log_file_path.display());
    Ok(())
}

fn level_from_env() -> Option<LevelFilter> {
    std::env::var(LOG_ENV_VAR).ok()?.parse().ok()
}

/// Log file operation that failed
pub fn log_file_error(path: &Path, operation: &str, error: &dyn std::error::Error) {
    error!(
        "File operation failed - Operation: {}, Path: {}, Error: {}",
        operation,
        path.display(),
        error
    );
}

/// Log fingerprint computation error
pub fn log_hash_error(path: &Path, error: &dyn std::error::Error) {
    error!(
        "Fingerprint computation failed - Path: {}, Error: {}",
        path.display(),
        error
    );
}
