//! Configuration loading for formcheck.
//!
//! A [`ConfigManager`] holds a flat key/value table that can be filled from
//! several layers (files, `.env`, the process environment, explicit `set`
//! calls). Later layers overwrite earlier ones key by key. Typed structs are
//! read back out with [`ConfigManager::get`] or [`ConfigManager::load_validated`].

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Layered configuration table.
#[derive(Clone, Default)]
pub struct ConfigManager {
    values: Arc<RwLock<Map<String, Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only variables named `PREFIX_*` are picked up by [`load_env`](Self::load_env).
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    fn extend(&self, entries: impl IntoIterator<Item = (String, Value)>) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.extend(entries);
    }

    fn snapshot(&self) -> Map<String, Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn load_env(&self) -> Result<()> {
        let vars = EnvLoader::new(self.env_prefix.clone()).load();
        formcheck_log::debug!("loaded {} environment variables", vars.len());
        self.extend(vars.into_iter().map(|(k, v)| (k, Value::String(v))));
        Ok(())
    }

    /// Read a `.env` file into the process environment, then [`load_env`](Self::load_env).
    ///
    /// Without a path a missing `.env` is not an error.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        self.load_env()
    }

    /// Merge a file's top-level table. The format follows the extension.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = ConfigLoader::auto(path)?.load_file(path)?;
        if let Value::Object(map) = data {
            self.extend(map);
        }
        Ok(())
    }

    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        self.extend([(key.to_string(), value)]);
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .raw(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value)
            .map_err(|e| ConfigError::DeserializationError(format!("{}: {}", key, e)))
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    /// The stored JSON value, untouched.
    pub fn raw(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    pub fn keys(&self) -> Vec<String> {
        self.snapshot().keys().cloned().collect()
    }

    /// Copy every entry of `other` over this table.
    pub fn merge(&self, other: &ConfigManager) {
        self.extend(other.snapshot());
    }

    /// Deserialize the whole table into `T` and run its checks.
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let config: T = serde_json::from_value(Value::Object(self.snapshot()))
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        mode: String,
        #[serde(default)]
        limit: u32,
    }

    impl Validate for Sample {
        fn validate(&self) -> Result<()> {
            ConfigValidator::one_of(&self.mode, &["skip", "reject"], "mode")
        }
    }

    #[test]
    fn test_set_and_get() {
        let manager = ConfigManager::new();
        manager.set("mode", "skip").unwrap();
        assert_eq!(manager.get_string("mode").unwrap(), "skip");
        assert!(manager.has("mode"));
        assert!(!manager.has("limit"));
    }

    #[test]
    fn test_get_missing_key() {
        let manager = ConfigManager::new();
        assert!(matches!(manager.get::<String>("nope"), Err(ConfigError::KeyNotFound(_))));
        assert_eq!(manager.get_or("nope", 3u32), 3);
    }

    #[test]
    fn test_merge_overwrites() {
        let base = ConfigManager::new();
        base.set("mode", "skip").unwrap();
        base.set("limit", 1).unwrap();

        let overlay = ConfigManager::new();
        overlay.set("mode", "reject").unwrap();

        base.merge(&overlay);
        assert_eq!(base.get_string("mode").unwrap(), "reject");
        assert_eq!(base.get::<u32>("limit").unwrap(), 1);
        assert_eq!(base.keys().len(), 2);
    }

    #[test]
    fn test_load_validated() {
        let manager = ConfigManager::new();
        manager.set("mode", "reject").unwrap();
        let sample: Sample = manager.load_validated().unwrap();
        assert_eq!(sample.mode, "reject");
        assert_eq!(sample.limit, 0);

        manager.set("mode", "explode").unwrap();
        assert!(matches!(
            manager.load_validated::<Sample>(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
