// LogManager Service
// File logger for the shell process

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde::Serialize;

use crate::services::{emit_event, EventSink};

const LOG_FILE_NAME: &str = "theme-background.log";

/// Record mirrored to the event sink; levels are numbered 1 (error) to 5 (trace)
#[derive(Serialize)]
struct LogEvent<'a> {
    level: u8,
    message: &'a str,
    target: &'a str,
}

fn level_code(level: Level) -> u8 {
    level as usize as u8
}

fn format_line(stamp: &DateTime<Local>, target: &str, level: Level, message: &str) -> String {
    format!(
        "[{}][{}][{target}][{level}] {message}",
        stamp.format("%Y-%m-%d"),
        stamp.format("%H:%M:%S")
    )
}

/// Appends formatted records to a log file and optionally mirrors them to an event sink
pub struct FileLogger {
    file: Mutex<File>,
    path: PathBuf,
    event_sink: Option<Arc<dyn EventSink>>,
    level: LevelFilter,
}

impl FileLogger {
    pub fn new(
        log_dir: &Path,
        level: LevelFilter,
        event_sink: Option<Arc<dyn EventSink>>,
    ) -> Result<Self, String> {
        std::fs::create_dir_all(log_dir)
            .map_err(|e| format!("Failed to create log directory: {e}"))?;

        let path = log_dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| format!("Failed to open log file: {e}"))?;

        Ok(Self {
            file: Mutex::new(file),
            path,
            event_sink,
            level,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        let line = format_line(&Local::now(), record.target(), record.level(), &message);

        match self.file.lock() {
            Ok(mut file) => {
                let _ = writeln!(file, "{line}");
            }
            Err(_) => return,
        }

        let Some(sink) = self.event_sink.as_deref() else {
            return;
        };
        emit_event(
            sink,
            "log://log",
            &LogEvent {
                level: level_code(record.level()),
                message: &message,
                target: record.target(),
            },
        );
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install a [`FileLogger`] as the global logger
pub fn init_logging(
    log_dir: &Path,
    level: LevelFilter,
    event_sink: Option<Arc<dyn EventSink>>,
) -> Result<(), String> {
    let logger = FileLogger::new(log_dir, level, event_sink)?;
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| format!("Failed to install logger: {e}"))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::NoopEventSink;
    use chrono::TimeZone;
    use serde_json::Value;
    use tempfile::tempdir;

    struct RecordingSink(Mutex<Vec<Value>>);

    impl EventSink for RecordingSink {
        fn emit(&self, _event: &str, payload: Value) {
            self.0.lock().unwrap().push(payload);
        }
    }

    #[test]
    fn test_writes_formatted_lines() {
        let temp = tempdir().unwrap();
        let sink = Arc::new(RecordingSink(Mutex::new(Vec::new())));
        let event_sink: Arc<dyn EventSink> = sink.clone();
        let logger = FileLogger::new(temp.path(), LevelFilter::Info, Some(event_sink)).unwrap();

        logger.log(
            &Record::builder()
                .args(format_args!("Stored theme 'vs'"))
                .level(Level::Info)
                .target("theme_background")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("filtered"))
                .level(Level::Debug)
                .target("theme_background")
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(logger.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("[theme_background][INFO] Stored theme 'vs'"));

        let events = sink.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["level"], 3);
    }

    #[test]
    fn test_format_line_and_level_codes() {
        let stamp = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            format_line(&stamp, "theme_background", Level::Warn, "Failed to write state"),
            "[2024-03-09][07:05:01][theme_background][WARN] Failed to write state"
        );

        let codes: Vec<u8> = [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace]
            .into_iter()
            .map(level_code)
            .collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_init_logging_installs_once() {
        let temp = tempdir().unwrap();
        let sink: Arc<dyn EventSink> = Arc::new(NoopEventSink);
        assert!(init_logging(temp.path(), LevelFilter::Warn, Some(sink)).is_ok());
        assert!(temp.path().join(LOG_FILE_NAME).exists());

        let err = init_logging(temp.path(), LevelFilter::Warn, None).unwrap_err();
        assert!(err.contains("Failed to install logger"));
    }
}
