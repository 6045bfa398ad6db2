use std::error::Error;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        };
        f.write_str(name)
    }
}

pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync>;

    fn info(&self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.log(Level::Info, message)
    }

    fn warn(&self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.log(Level::Warning, message)
    }

    fn error(&self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.log(Level::Error, message)
    }
}

pub fn nested_namespace(current: Option<&str>, namespace: &str) -> String {
    match current {
        Some(current) => format!("{}:{}", current, namespace),
        None => namespace.to_string(),
    }
}

pub fn with_namespace_prefix(namespace: Option<&str>, message: &str) -> String {
    match namespace {
        Some(namespace) => format!("{}: {}", namespace, message),
        None => message.to_string(),
    }
}
