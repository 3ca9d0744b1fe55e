//! Logging for the formcheck validation engine.
//!
//! Records go to stderr (or to the `log` facade) depending on the
//! `FORMCHECK_LOG_FORMAT` variable. Nothing is printed below `warn`
//! unless `FORMCHECK_DEBUG=1` or `FORMCHECK_LOG_LEVEL` says otherwise.
//!
//! ```rust
//! use formcheck_log::{debug, warn};
//!
//! let rule = "age";
//! debug!("dispatching rule {}", rule);
//! warn!(target: "formcheck::engine", "no rule registered for {}", rule);
//! ```

mod config;
mod emit;
mod level;

pub use config::{
    config, current_level, init, is_debug_enabled, is_level_enabled, set_debug, set_level,
    LogConfig,
};
pub use emit::log;
pub use level::{Format, Level, UnknownName};

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:expr, $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($level) {
            $crate::log($level, $target, &format!($($arg)+));
        }
    };
}

/// Log at trace level.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Trace, $target, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Trace, module_path!(), $($arg)+)
    };
}

/// Log at debug level. Also enabled by `FORMCHECK_DEBUG=1`.
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        $crate::debug!(target: module_path!(), $($arg)+)
    };
}

/// Log at info level.
#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Info, $target, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Info, module_path!(), $($arg)+)
    };
}

/// Log at warn level.
#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Warn, $target, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Warn, module_path!(), $($arg)+)
    };
}

/// Log at error level.
#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Error, $target, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Error, module_path!(), $($arg)+)
    };
}

#[cfg(feature = "tracing")]
pub mod tracing_compat {
    //! A `tracing` subscriber whose filter defaults to the `FORMCHECK_LOG_LEVEL` setting.

    use super::*;

    pub fn subscriber() -> impl tracing::Subscriber + Send + Sync {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{fmt, EnvFilter};

        let config = config();
        let directive = match config.level {
            Level::Off => "off".to_string(),
            level => level.as_str().to_ascii_lowercase(),
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(config.color))
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_expand() {
        let field = "fullname";
        crate::trace!("trace {}", field);
        crate::debug!("debug {}", field);
        crate::info!("info");
        crate::warn!(target: "formcheck::test", "warn {}", field);
        crate::error!(target: "formcheck::test", "error");
    }
}
