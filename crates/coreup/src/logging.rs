use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::cli::RunConfig;

struct ResilientFileWriter {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl ResilientFileWriter {
    fn new(path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    fn ensure_file(&self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            *guard = Some(file);
        }

        Ok(())
    }
}

impl Write for ResilientFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.ensure_file()?;
        let mut guard = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(ref mut file) = *guard {
            file.write(buf)
        } else {
            Err(io::Error::other("File not available"))
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(ref mut file) = *guard {
            file.flush()
        } else {
            Ok(())
        }
    }
}

fn trim_log_file_if_oversized(log_path: &Path, max_log_size: u64) {
    if let Ok(metadata) = std::fs::metadata(log_path)
        && metadata.len() > max_log_size
        && let Ok(contents) = std::fs::read(log_path)
    {
        let half = contents.len() / 2;
        let keep_from = contents[half..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(half, |pos| half + pos + 1);
        let _ = std::fs::write(log_path, &contents[keep_from..]);
    }
}

/// Level of the terminal progress output, or `None` when it is disabled.
fn console_level(config: &RunConfig) -> Option<LevelFilter> {
    match (config.console, config.debug) {
        (false, _) => None,
        (true, true) => Some(LevelFilter::Debug),
        (true, false) => Some(LevelFilter::Info),
    }
}

/// Install the terminal reporter and the debug log file.
///
/// The file always records debug output; the terminal follows `--quiet` and
/// `--debug`. Failure to open the log file is not fatal.
pub fn init_logging(config: &RunConfig) {
    trim_log_file_if_oversized(&config.log_file, config.max_log_size_bytes);

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("coreup")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if let Some(level) = console_level(config) {
        let term_config = ConfigBuilder::new()
            .set_time_level(LevelFilter::Off)
            .set_target_level(LevelFilter::Off)
            .set_thread_level(LevelFilter::Off)
            .add_filter_allow_str("coreup")
            .build();
        loggers.push(TermLogger::new(
            level,
            term_config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    match ResilientFileWriter::new(config.log_file.clone()) {
        Ok(writer) => loggers.push(WriteLogger::new(LevelFilter::Debug, log_config, writer)),
        Err(error) => {
            if config.console {
                eprintln!(
                    "Failed to open log file {}: {error}",
                    config.log_file.display()
                );
            }
        }
    }

    let _ = CombinedLogger::init(loggers);
    log::debug!("Logging initialized, log file: {}", config.log_file.display());
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;
    use std::path::PathBuf;
    use std::time::Duration;

    use simplelog::LevelFilter;

    use super::{ResilientFileWriter, console_level, trim_log_file_if_oversized};
    use crate::cli::RunConfig;

    fn config(console: bool, debug: bool) -> RunConfig {
        RunConfig {
            cores_file: PathBuf::from("cores.json"),
            base_dir: PathBuf::from("."),
            api_base_url: String::new(),
            http_timeout: Duration::from_secs(1),
            check_only: false,
            console,
            debug,
            log_file: PathBuf::from("coreup.log"),
            max_log_size_bytes: 1024,
        }
    }

    #[test]
    fn resilient_writer_recreates_missing_file_on_write() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("coreup.log");
        let mut writer =
            ResilientFileWriter::new(log_path.clone()).expect("writer should open log file");

        writer
            .write_all(b"first line\n")
            .expect("initial write should succeed");
        std::fs::remove_file(&log_path).expect("log file should be removable");
        writer
            .write_all(b"second line\n")
            .expect("writer should recreate file after deletion");

        let contents =
            std::fs::read_to_string(&log_path).expect("recreated file should be readable");
        assert_eq!(contents, "second line\n");
    }

    #[test]
    fn resilient_writer_creates_missing_parent_directories() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("data").join("coreup.log");

        let _writer = ResilientFileWriter::new(log_path.clone()).expect("writer should open");
        assert!(log_path.is_file());
    }

    #[test]
    fn trim_log_file_keeps_recent_half() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("coreup.log");
        let original = "line-1\nline-2\nline-3\nline-4\nline-5\n";
        std::fs::write(&log_path, original).expect("test log file should be written");

        trim_log_file_if_oversized(&log_path, 10);

        let trimmed =
            std::fs::read_to_string(&log_path).expect("trimmed log file should be readable");
        assert!(trimmed.starts_with("line-4\n") || trimmed.starts_with("line-3\n"));
        assert!(!trimmed.contains("line-1"));
    }

    #[test]
    fn console_level_follows_quiet_and_debug() {
        assert_eq!(console_level(&config(false, true)), None);
        assert_eq!(console_level(&config(true, false)), Some(LevelFilter::Info));
        assert_eq!(console_level(&config(true, true)), Some(LevelFilter::Debug));
    }
}
