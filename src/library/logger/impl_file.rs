use crate::library::logger::interface::{nested_namespace, with_namespace_prefix, Level, Logger};
use chrono::{DateTime, Local};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Appends one line per entry to a plain text log file. Loggers derived with
/// `with_namespace` share the same file handle.
#[derive(Debug, Clone)]
pub struct LoggerFile {
    file: Arc<Mutex<File>>,
    namespace: Option<String>,
}

impl LoggerFile {
    pub fn new(path: &Path) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
            namespace: None,
        })
    }
}

pub fn format_line(time: DateTime<Local>, level: Level, message: &str) -> String {
    format!(
        "{} - {} - {}",
        time.format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        message
    )
}

impl Logger for LoggerFile {
    fn log(&self, level: Level, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let line = format_line(
            Local::now(),
            level,
            &with_namespace_prefix(self.namespace.as_deref(), message),
        );
        let mut file = self.file.lock().map_err(|_| "log file lock poisoned")?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerFile {
            file: self.file.clone(),
            namespace: Some(nested_namespace(self.namespace.as_deref(), namespace)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_format_line() {
        let time = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(
            format_line(time, Level::Warning, "Default model not found"),
            "2025-03-14 09:26:53,000 - WARNING - Default model not found"
        );
    }

    #[test]
    fn test_appends_lines_with_namespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let logger = LoggerFile::new(&path).unwrap();
        logger.info("Model loaded").unwrap();
        logger
            .with_namespace("history")
            .error("History export failed")
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - INFO - Model loaded"));
        assert!(lines[1].ends_with(" - ERROR - history: History export failed"));
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        LoggerFile::new(&path).unwrap().info("first").unwrap();
        LoggerFile::new(&path).unwrap().info("second").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
