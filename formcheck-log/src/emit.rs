// Record formatting and output

use crate::{config, is_level_enabled, Format, Level, LogConfig};
use std::io::Write;

/// Write one record. Called by the macros; not meant for direct use.
#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    if !is_level_enabled(level) {
        return;
    }

    let config = config();
    match config.format {
        Format::Pretty => write_pretty(level, target, message, config),
        Format::Compact => write_compact(level, target, message, config),
        Format::Json => write_json(level, target, message),
        Format::Facade => {
            if let Some(level) = level.to_log() {
                log::log!(target: target, level, "{}", message);
            }
        }
    }
}

fn write_pretty(level: Level, target: &str, message: &str, config: &LogConfig) {
    let mut out = std::io::stderr().lock();

    if config.timestamps {
        let _ = write!(out, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"));
    }

    #[cfg(feature = "color")]
    {
        if config.color {
            use colored::Colorize;
            let _ = writeln!(out, "{:5} {} {}", level.colored(), target.dimmed(), message);
            return;
        }
    }

    let _ = writeln!(out, "{:5} [{}] {}", level.as_str(), target, message);
}

fn write_compact(level: Level, target: &str, message: &str, config: &LogConfig) {
    let mut out = std::io::stderr().lock();
    let stamp = if config.timestamps {
        chrono::Local::now().format("%H:%M:%S ").to_string()
    } else {
        String::new()
    };
    let initial = level.as_str().chars().next().unwrap_or('?');
    let _ = writeln!(out, "{}{} {}: {}", stamp, initial, target, message);
}

#[cfg(feature = "json")]
#[derive(serde::Serialize)]
struct JsonRecord<'a> {
    timestamp: String,
    level: &'a str,
    target: &'a str,
    message: &'a str,
}

#[cfg(feature = "json")]
pub(crate) fn json_line(level: Level, target: &str, message: &str) -> String {
    let record = JsonRecord {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.as_str(),
        target,
        message,
    };
    serde_json::to_string(&record).unwrap_or_default()
}

#[cfg(not(feature = "json"))]
pub(crate) fn json_line(level: Level, target: &str, message: &str) -> String {
    fn quote(s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }

    format!(
        r#"{{"timestamp":{},"level":{},"target":{},"message":{}}}"#,
        quote(&chrono::Utc::now().to_rfc3339()),
        quote(level.as_str()),
        quote(target),
        quote(message)
    )
}

fn write_json(level: Level, target: &str, message: &str) {
    let _ = writeln!(std::io::stderr().lock(), "{}", json_line(level, target, message));
}
