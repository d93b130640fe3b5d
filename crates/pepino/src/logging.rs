//! Logging initialisation for feature runs.
//!
//! The engine logs through the `log` facade. This module installs a
//! `tracing-subscriber` formatter on stderr that also receives `log`
//! records, keeping stdout free for the program under test.

use tracing_subscriber::EnvFilter;

use crate::config::RunnerConfig;

fn filter_from_config(config: &RunnerConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Install the global subscriber at the configured level.
///
/// A subscriber that is already installed is kept; repeated calls are
/// harmless.
pub fn init_logging(config: &RunnerConfig) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .try_init();
    if result.is_err() {
        log::debug!("a global subscriber is already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use serial_test::serial;

    #[test]
    #[serial]
    fn init_logging_is_idempotent() {
        let config = RunnerConfig::default();
        init_logging(&config);
        init_logging(&config);
    }

    #[test]
    fn filter_uses_config_log_level() {
        let config = RunnerConfig::default().with_log_level(LogLevel::Debug);
        assert_eq!(filter_from_config(&config).to_string(), "debug");
    }
}
