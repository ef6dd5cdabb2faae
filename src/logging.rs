use std::path::Path;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};

const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start rotated file logging under the given directory.
///
/// Logs go to files only; stdout stays clean for command output. The
/// returned handle must be kept alive for the duration of the process,
/// dropping it flushes and stops the logger.
pub fn init(level: &str, log_dir: &Path) -> Result<LoggerHandle, String> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        format!(
            "could not create log directory {}: {}",
            log_dir.display(),
            e
        )
    })?;

    Logger::try_with_str(level)
        .map_err(|e| format!("invalid log level \"{level}\": {e}"))?
        .log_to_file(FileSpec::default().directory(log_dir).basename("taskdeck"))
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .start()
        .map_err(|e| format!("could not start logger: {e}"))
}
