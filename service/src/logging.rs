use crate::config::Config;
use log::LevelFilter;
use simplelog::{self, ConfigBuilder};

/// Modules to filter out from logging when not in Trace mode.
/// These are typically verbose dependencies that clutter normal log output.
const FILTERED_MODULES: &[&str] = &["reqwest", "hyper", "rustls", "h2", "tracing"];

pub struct Logger {}

impl Logger {
    /// Initializes the global logger with configuration based on the provided Config.
    ///
    /// When the log level is set to Trace, all logs including dependency logs are shown.
    /// For all other log levels, verbose dependency logs are filtered out.
    pub fn init_logger(config: &Config) {
        let apply_filters = Self::should_filter_dependencies(config.log_level_filter);
        let log_config = Self::build_log_config(apply_filters);

        simplelog::TermLogger::init(
            Self::convert_level_filter(config.log_level_filter),
            log_config,
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
        .expect("Failed to start simplelog");
    }

    /// Converts log::LevelFilter to simplelog::LevelFilter.
    fn convert_level_filter(level: LevelFilter) -> simplelog::LevelFilter {
        match level {
            LevelFilter::Off => simplelog::LevelFilter::Off,
            LevelFilter::Error => simplelog::LevelFilter::Error,
            LevelFilter::Warn => simplelog::LevelFilter::Warn,
            LevelFilter::Info => simplelog::LevelFilter::Info,
            LevelFilter::Debug => simplelog::LevelFilter::Debug,
            LevelFilter::Trace => simplelog::LevelFilter::Trace,
        }
    }

    /// Returns `false` for Trace level (show all logs), `true` for all other levels.
    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    /// Builds a simplelog Config, suppressing noisy dependency logs when `apply_filters` is true.
    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}
