use liveblocks_mcp::config::secrets::ExposeSecret;
use liveblocks_mcp::config::{
    Config, DEFAULT_LOG_LEVEL, EnvFile, Environment, SECRET_KEY_VAR, load_env_file, missing_vars,
};
use liveblocks_mcp::error::Error;
use std::path::PathBuf;

fn env(pairs: &[(&str, &str)]) -> Environment {
    Environment::from_pairs(pairs.iter().copied())
}

fn temp_env_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("liveblocks-mcp-{}-{name}.env", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn config_from_environment_loads_required_fields() {
    let config = Config::from_environment(&env(&[(SECRET_KEY_VAR, "sk_test_abc123")])).unwrap();

    assert_eq!(config.liveblocks_secret_key.expose_secret(), "sk_test_abc123");
    assert!(!config.debug);
    assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    assert!(config.otel_endpoint.is_none());
}

#[test]
fn config_fails_without_required() {
    let result = Config::from_environment(&Environment::default());

    match result {
        Err(Error::ConfigurationMissing(names)) => assert_eq!(names, vec![SECRET_KEY_VAR]),
        other => panic!("expected ConfigurationMissing, got {other:?}"),
    }
}

#[test]
fn empty_value_counts_as_missing() {
    let snapshot = env(&[(SECRET_KEY_VAR, "")]);

    assert_eq!(missing_vars(&snapshot), vec![SECRET_KEY_VAR.to_string()]);
    assert!(Config::from_environment(&snapshot).is_err());
}

#[test]
fn nothing_missing_when_secret_is_set() {
    assert!(missing_vars(&env(&[(SECRET_KEY_VAR, "abc123")])).is_empty());
}

#[test]
fn debug_only_enabled_by_exact_true() {
    for (value, expected) in [("true", true), ("TRUE", false), ("1", false), ("yes", false)] {
        let config =
            Config::from_environment(&env(&[(SECRET_KEY_VAR, "abc123"), ("DEBUG", value)])).unwrap();
        assert_eq!(config.debug, expected, "DEBUG={value}");
    }
}

#[test]
fn optional_settings_are_read() {
    let config = Config::from_environment(&env(&[
        (SECRET_KEY_VAR, "abc123"),
        ("LOG_LEVEL", "trace"),
        ("OTEL_ENDPOINT", "http://localhost:4317"),
    ]))
    .unwrap();

    assert_eq!(config.log_level, "trace");
    assert_eq!(config.otel_endpoint.as_deref(), Some("http://localhost:4317"));
}

#[test]
fn empty_log_level_falls_back_to_default() {
    let config =
        Config::from_environment(&env(&[(SECRET_KEY_VAR, "abc123"), ("LOG_LEVEL", "")])).unwrap();
    assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
}

#[test]
fn config_debug_output_redacts_secret() {
    let config = Config::from_environment(&env(&[(SECRET_KEY_VAR, "sk_super_secret")])).unwrap();
    let rendered = format!("{config:?}");

    assert!(!rendered.contains("sk_super_secret"));
}

#[test]
fn env_file_populates_process_environment() {
    let path = temp_env_file("populate", "LIVEBLOCKS_MCP_TEST_FROM_FILE=from-file\n");

    let loaded = load_env_file(Some(&path));

    assert_eq!(loaded, EnvFile::Loaded(path.clone()));
    assert_eq!(
        Environment::capture().get("LIVEBLOCKS_MCP_TEST_FROM_FILE"),
        Some("from-file")
    );
    std::fs::remove_file(path).ok();
}

#[test]
fn env_file_does_not_override_existing_variables() {
    unsafe {
        std::env::set_var("LIVEBLOCKS_MCP_TEST_PRESET", "from-process");
    }
    let path = temp_env_file("preset", "LIVEBLOCKS_MCP_TEST_PRESET=from-file\n");

    load_env_file(Some(&path));

    assert_eq!(
        Environment::capture().get("LIVEBLOCKS_MCP_TEST_PRESET"),
        Some("from-process")
    );
    std::fs::remove_file(path).ok();
}

#[test]
fn missing_env_file_is_absent_not_an_error() {
    let path = std::env::temp_dir().join("liveblocks-mcp-does-not-exist.env");

    assert_eq!(load_env_file(Some(&path)), EnvFile::Absent);
}
