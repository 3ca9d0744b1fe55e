// Configuration file parsing

use crate::{ConfigError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Formats a configuration file may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }
}

/// Parses configuration text into a JSON object, whatever the source format.
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Pick the format from the file extension.
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError(format!("{} has no extension", path.display())))?;

        FileFormat::from_extension(ext)
            .map(Self::new)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        formcheck_log::debug!("loaded configuration file {}", path.display());

        self.parse(&content)
    }

    pub fn parse(&self, content: &str) -> Result<Value> {
        let value = match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON: {}", e)))?,
            FileFormat::Toml => {
                let table: toml::Table = toml::from_str(content)
                    .map_err(|e| ConfigError::ParseError(format!("TOML: {}", e)))?;
                serde_json::to_value(table)
                    .map_err(|e| ConfigError::ParseError(format!("TOML: {}", e)))?
            }
            FileFormat::Env => parse_env(content),
        };

        if value.is_object() {
            Ok(value)
        } else {
            Err(ConfigError::ParseError(
                "top level of a configuration file must be a table".to_string(),
            ))
        }
    }
}

fn parse_env(content: &str) -> Value {
    let mut map = Map::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            map.insert(key.trim().to_lowercase(), Value::String(value.to_string()));
        }
    }

    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let value = loader.parse(r#"{"missing_rule": "skip"}"#).unwrap();
        assert_eq!(value["missing_rule"], "skip");
    }

    #[test]
    fn test_parse_toml() {
        let loader = ConfigLoader::new(FileFormat::Toml);
        let value = loader
            .parse("missing_rule = \"fallback\"\ninert_rules = [\"email\"]\n")
            .unwrap();
        assert_eq!(value["missing_rule"], "fallback");
        assert_eq!(value["inert_rules"][0], "email");
    }

    #[test]
    fn test_parse_env_lowercases_keys() {
        let loader = ConfigLoader::new(FileFormat::Env);
        let value = loader
            .parse("# comment\nMISSING_RULE=reject\nexport EMAIL_PATTERN='^.+@.+$'\n")
            .unwrap();
        assert_eq!(value["missing_rule"], "reject");
        assert_eq!(value["email_pattern"], "^.+@.+$");
    }

    #[test]
    fn test_json_array_is_rejected() {
        let loader = ConfigLoader::new(FileFormat::Json);
        assert!(matches!(loader.parse("[1, 2]"), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("TOML"), Some(FileFormat::Toml));
        assert!(ConfigLoader::auto("form.yaml").is_err());
        assert!(ConfigLoader::auto("formcheck").is_err());
        assert_eq!(ConfigLoader::auto("form.json").unwrap().format(), FileFormat::Json);
    }
}
