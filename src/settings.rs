use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_OUTPUT_DIR: &str = "nflgames";
const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// Where `download-season` writes one JSON file per game.
    pub output_dir: PathBuf,
    pub log_level: LevelFilter,
    /// Pause between game downloads, to go easy on ESPN.
    pub request_delay: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_level: LevelFilter::Info,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_env(|key| std::env::var(key).ok())
    }

    fn from_env(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        Self {
            output_dir: non_empty("NFLGD_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            log_level: non_empty("NFLGD_LOG")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.log_level),
            request_delay: non_empty("NFLGD_REQUEST_DELAY_MS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_delay),
        }
    }
}
