//! Structured logging setup
//!
//! Log output goes to stderr so listings printed on stdout stay clean for
//! piping. `RUST_LOG` takes precedence over the configured level.
//!
//! ```no_run
//! use hdlforge::util::logging;
//!
//! logging::init_from_env();
//! tracing::info!(tool = "vivado", "Generating project script");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

const JSON_VAR: &str = "HDLFORGE_LOG_JSON";

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Minimum level for hdlforge events
    pub level: Level,

    /// One JSON object per event instead of human-readable lines
    pub use_json: bool,

    pub include_target: bool,

    /// File and line of the emitting call site
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Machine-readable output for CI logs
    pub fn ci(level: Level) -> Self {
        Self {
            level,
            use_json: true,
            include_target: true,
            include_location: true,
        }
    }

    /// Human output, or CI output when `HDLFORGE_LOG_JSON=true`
    pub fn for_level(level: Level) -> Self {
        let use_json = env::var(JSON_VAR)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);
        if use_json {
            Self::ci(level)
        } else {
            Self {
                level,
                ..Default::default()
            }
        }
    }
}

/// Parses a log level, case-insensitive; unknown names fall back to INFO
///
/// ```
/// use hdlforge::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("Debug"), Level::DEBUG);
/// assert_eq!(parse_level("loud"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', using info (expected trace, debug, info, warn or error)",
                level_str
            );
            Level::INFO
        }
    }
}

/// Installs the global subscriber; later calls are no-ops
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            if let Ok(directive) = format!("hdlforge={}", config.level).parse() {
                filter = filter.add_directive(directive);
            }
        }

        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        let registry = tracing_subscriber::registry().with(filter);
        if config.use_json {
            registry.with(layer.json()).init();
        } else {
            registry.with(layer.without_time()).init();
        }
    });
}

/// Reads `HDLFORGE_LOG_LEVEL` and `HDLFORGE_LOG_JSON`
pub fn init_from_env() {
    let level = env::var("HDLFORGE_LOG_LEVEL")
        .map(|l| parse_level(&l))
        .unwrap_or(Level::INFO);
    init_logging(LoggingConfig::for_level(level));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use yare::parameterized;

    #[parameterized(
        trace = { "trace", Level::TRACE },
        debug_upper = { "DEBUG", Level::DEBUG },
        info = { "info", Level::INFO },
        warn_mixed = { "Warn", Level::WARN },
        error = { "error", Level::ERROR },
        unknown = { "verbose", Level::INFO },
        empty = { "", Level::INFO },
    )]
    fn test_parse_level(input: &str, expected: Level) {
        assert_eq!(parse_level(input), expected);
    }

    #[test]
    fn test_ci_keeps_level() {
        let config = LoggingConfig::ci(Level::DEBUG);
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.use_json);
        assert!(config.include_location);
    }

    #[test]
    #[serial]
    fn test_json_switch() {
        let old = env::var(JSON_VAR).ok();

        env::set_var(JSON_VAR, "true");
        assert_eq!(LoggingConfig::for_level(Level::WARN), LoggingConfig::ci(Level::WARN));

        env::set_var(JSON_VAR, "nope");
        let config = LoggingConfig::for_level(Level::WARN);
        assert!(!config.use_json);
        assert_eq!(config.level, Level::WARN);

        match old {
            Some(v) => env::set_var(JSON_VAR, v),
            None => env::remove_var(JSON_VAR),
        }
    }
}
