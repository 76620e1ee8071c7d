use log::LevelFilter;
use simplelog::{Config, SimpleLogger};

/// Maps a configuration string ("error", "warn", "info", "debug", "trace", "off",
/// any case) to a level filter. Unknown names fall back to `Info`.
pub fn level_from_str(level: &str) -> LevelFilter {
    level.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::Info)
}

/// Installs the terminal logger. Returns false if a logger was already installed.
pub fn init_logging(level: &str) -> bool {
    SimpleLogger::init(level_from_str(level), Config::default()).is_ok()
}
