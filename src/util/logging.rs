//! Structured logging setup for code-compass
//!
//! Logs always go to stderr so that extraction results on stdout stay
//! machine-readable. The subscriber can only be installed once per process;
//! later calls are ignored.
//!
//! # Example
//!
//! ```no_run
//! use code_compass::util::logging;
//! use tracing::{debug, info};
//!
//! logging::init_from_env();
//!
//! info!("Extraction started");
//! debug!(file = "Main.java", "Classifying document");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Crates whose chatter is capped at `warn` unless `RUST_LOG` says otherwise
const NOISY_DEPENDENCIES: &[&str] = &["h2", "hyper", "hyper_util", "reqwest", "ignore"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for this crate's own events
    pub level: Level,

    /// Emit one JSON object per event instead of human-readable lines
    pub use_json: bool,

    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with full metadata, for log collection.
    pub fn structured() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            include_target: true,
            ..Default::default()
        }
    }
}

/// Parses a log level name, case-insensitively.
///
/// Unknown names fall back to `INFO` with a note on stderr.
///
/// ```
/// use code_compass::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
/// assert_eq!(parse_level("chatty"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    let mut directives = vec![level.to_string().to_lowercase()];
    for dependency in NOISY_DEPENDENCIES {
        directives.push(format!("{}=warn", dependency));
    }
    directives.push(format!("code_compass={}", level.to_string().to_lowercase()));

    EnvFilter::try_new(directives.join(","))
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()))
}

/// Installs the global subscriber. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids)
            .with_thread_names(config.include_thread_ids);

        let registry = tracing_subscriber::registry().with(filter);
        let result = if config.use_json {
            registry.with(layer.json()).try_init()
        } else {
            registry.with(layer).try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialized: {}", e);
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initializes logging from `COMPASS_LOG_LEVEL` and `COMPASS_LOG_JSON`.
///
/// `RUST_LOG`, when set, replaces the computed filter entirely.
pub fn init_from_env() {
    init_logging(config_from_env());
}

/// Settings for one command-line run.
///
/// An explicit `level` wins over `COMPASS_LOG_LEVEL`. `COMPASS_LOG_JSON=true`
/// selects the structured preset; otherwise `verbose` selects the development
/// preset.
pub fn cli_config(level: Option<Level>, verbose: bool) -> LoggingConfig {
    let env_config = config_from_env();
    let level = level.unwrap_or(env_config.level);

    if env_config.use_json {
        LoggingConfig {
            level,
            ..LoggingConfig::structured()
        }
    } else if verbose {
        LoggingConfig {
            level,
            ..LoggingConfig::development()
        }
    } else {
        LoggingConfig::with_level(level)
    }
}

fn config_from_env() -> LoggingConfig {
    let level = env::var("COMPASS_LOG_LEVEL")
        .map(|l| parse_level(&l))
        .unwrap_or(Level::INFO);

    let use_json = env::var("COMPASS_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    LoggingConfig {
        level,
        use_json,
        ..Default::default()
    }
}
