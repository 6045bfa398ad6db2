use crate::config::{DEFAULT_CONFIG_PATH, DEFAULT_LOG_PATH};
use clap::Parser;
use std::path::PathBuf;

/// Desktop tool that classifies cell images as cancerous or non-cancerous.
#[derive(Parser, Debug)]
#[command(name = "cancer-detector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file, created with defaults when missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log file, appended to on every run
    #[arg(short, long, default_value = DEFAULT_LOG_PATH)]
    pub log_file: PathBuf,

    /// Use a random classifier instead of loading a model
    #[arg(long)]
    pub demo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cancer-detector"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert_eq!(cli.log_file, PathBuf::from("cancer_app.log"));
        assert!(!cli.demo);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "cancer-detector",
            "--config",
            "alt.json",
            "--log-file",
            "run.log",
            "--demo",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("alt.json"));
        assert_eq!(cli.log_file, PathBuf::from("run.log"));
        assert!(cli.demo);
    }
}
