//! Loading configuration files from disk

use formcheck_config::*;
use std::io::Write;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_toml_then_json_layering() {
    let dir = tempfile::tempdir().unwrap();
    let toml = write_file(&dir, "base.toml", "missing_rule = \"skip\"\ninert_rules = [\"date\"]\n");
    let json = write_file(&dir, "override.json", r#"{"missing_rule": "fallback"}"#);

    let manager = ConfigManager::new();
    manager.load_file(&toml).unwrap();
    manager.load_file(&json).unwrap();

    assert_eq!(manager.get_string("missing_rule").unwrap(), "fallback");
    assert_eq!(manager.get::<Vec<String>>("inert_rules").unwrap(), vec!["date"]);
}

#[test]
fn test_env_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "form.env", "EMAIL_PATTERN=\"^[^@]+@[^@]+$\"\n");

    let manager = ConfigManager::new();
    manager.load_file(&path).unwrap();
    assert_eq!(manager.get_string("email_pattern").unwrap(), "^[^@]+@[^@]+$");
}

#[test]
fn test_missing_file_is_load_error() {
    let manager = ConfigManager::new();
    let err = manager.load_file("/nonexistent/formcheck.toml").unwrap_err();
    assert!(matches!(err, ConfigError::LoadError(_)));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "bad.toml", "missing_rule = \n");
    let err = ConfigManager::new().load_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}
