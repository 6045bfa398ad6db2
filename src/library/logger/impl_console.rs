use crate::library::logger::interface::{nested_namespace, with_namespace_prefix, Level, Logger};
use chrono::Local;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct LoggerConsole {
    namespace: Option<String>,
}

impl LoggerConsole {
    pub fn new() -> Self {
        Self { namespace: None }
    }
}

impl Logger for LoggerConsole {
    fn log(&self, level: Level, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let formatted = Local::now().format("%Y-%m-%d %I:%M:%S%.3f %p");
        println!(
            "[{}] {} {}",
            formatted,
            level,
            with_namespace_prefix(self.namespace.as_deref(), message)
        );
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerConsole {
            namespace: Some(nested_namespace(self.namespace.as_deref(), namespace)),
        })
    }
}
