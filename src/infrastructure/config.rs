use super::gateway::DEFAULT_API_URL;
use clap::Parser;
use std::path::PathBuf;

/// Command-line and environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "formpilot")]
#[command(version, about = "Turn spreadsheet rows into a filled W-7 form", long_about = None)]
pub struct Config {
    /// Base URL of the form service
    #[arg(long, env = "FORMPILOT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory downloaded PDFs are written to
    #[arg(long, default_value = ".")]
    pub download_dir: PathBuf,

    /// Spreadsheet to stage on startup
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Directory for log files (defaults to the platform data directory)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,
}

impl Config {
    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn logs_path(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("formpilot")
                .join("logs")
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            download_dir: PathBuf::from("."),
            file: None,
            log_dir: None,
            debug: false,
        }
    }
}
