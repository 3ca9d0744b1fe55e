// Environment-driven logging configuration

use crate::{Format, Level};
use once_cell::sync::Lazy;
use std::env;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

pub(crate) static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);
pub(crate) static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);

static CONFIG: Lazy<LogConfig> = Lazy::new(|| {
    let config = LogConfig::from_env();
    DEBUG_ENABLED.store(config.debug, Ordering::SeqCst);
    LOG_LEVEL.store(config.level as u8, Ordering::SeqCst);
    config
});

/// Snapshot of the `FORMCHECK_*` logging variables.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug: bool,
    pub level: Level,
    pub format: Format,
    pub color: bool,
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Warn,
            format: Format::Json,
            color: false,
            timestamps: true,
        }
    }
}

fn flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

impl LogConfig {
    /// Read the configuration from the process environment.
    ///
    /// - `FORMCHECK_DEBUG=1` lowers the level to debug
    /// - `FORMCHECK_LOG_LEVEL=trace|debug|info|warn|error|off`
    /// - `FORMCHECK_LOG_FORMAT=pretty|compact|json|facade`
    /// - `FORMCHECK_LOG_COLOR=1|0`, defaults to whether stderr is a terminal
    /// - `FORMCHECK_LOG_TIMESTAMPS=1|0`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let debug = flag("FORMCHECK_DEBUG").unwrap_or(false);

        let level = env::var("FORMCHECK_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("FORMCHECK_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.format);

        let color = flag("FORMCHECK_LOG_COLOR").unwrap_or_else(|| {
            env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
        });

        Self {
            debug,
            level,
            format,
            color,
            timestamps: flag("FORMCHECK_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps),
        }
    }
}

/// Force the environment to be read now rather than on the first record.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// The process-wide configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

#[inline]
pub fn is_debug_enabled() -> bool {
    init();
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    init();
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

pub fn current_level() -> Level {
    init();
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Override the level at runtime.
pub fn set_level(level: Level) {
    init();
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Toggle debug mode at runtime. Enabling it never raises the level above debug.
pub fn set_debug(enabled: bool) {
    init();
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}
