use crate::library::logger::interface::{Level, Logger};
use std::error::Error;
use std::sync::Arc;

/// Fans every entry out to all wrapped loggers. Every logger is tried; the
/// first failure is reported.
pub struct LoggerMulti {
    loggers: Vec<Arc<dyn Logger + Send + Sync>>,
}

impl LoggerMulti {
    pub fn new(loggers: Vec<Arc<dyn Logger + Send + Sync>>) -> Self {
        Self { loggers }
    }
}

impl Logger for LoggerMulti {
    fn log(&self, level: Level, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut first_error = None;
        for logger in &self.loggers {
            if let Err(e) = logger.log(level, message) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerMulti {
            loggers: self
                .loggers
                .iter()
                .map(|logger| logger.with_namespace(namespace))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;
    use crate::library::logger::impl_file::LoggerFile;
    use tempfile::tempdir;

    #[test]
    fn test_writes_to_every_logger() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");

        let logger = LoggerMulti::new(vec![
            Arc::new(LoggerFile::new(&first).unwrap()),
            Arc::new(LoggerConsole::new()),
            Arc::new(LoggerFile::new(&second).unwrap()),
        ]);
        logger.with_namespace("detector").warn("careful").unwrap();

        for path in [first, second] {
            let contents = std::fs::read_to_string(path).unwrap();
            assert!(contents.trim_end().ends_with("WARNING - detector: careful"));
        }
    }
}
