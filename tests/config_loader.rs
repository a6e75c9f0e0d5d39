mod common;

use common::temp_config;
use packlist::config::{Config, ConfigError};
use packlist::sync::SyncSettings;
use std::time::Duration;

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.sync.throttle_ms, 5000);
    assert_eq!(config.sync.deferred_delay_ms, 5001);
    assert_eq!(config.sync.local_key, "library");
    assert_eq!(config.remote.base_url, "https://lighterpack.com");
    assert_eq!(config.remote.timeout_seconds, 30);
    assert_eq!(config.remote.connect_timeout_seconds, 5);
    assert!(config.storage.data_dir.is_none());
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("packlist/config.toml"));
}

#[test]
fn test_missing_file_yields_default() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.sync.throttle_ms, 5000);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let (_dir, path) = temp_config(
        r#"
[sync]
throttle_ms = 1000

[storage]
data_dir = "/tmp/packlist-data"
"#,
    );

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.sync.throttle_ms, 1000);
    assert_eq!(config.sync.deferred_delay_ms, 5001);
    assert_eq!(config.remote.base_url, "https://lighterpack.com");
    assert_eq!(
        config.data_dir(),
        std::path::PathBuf::from("/tmp/packlist-data")
    );
}

#[test]
fn test_settings_from_config() {
    let (_dir, path) = temp_config(
        r#"
[sync]
throttle_ms = 200
deferred_delay_ms = 201
local_key = "packs"
"#,
    );

    let config = Config::load_from(&path).unwrap();
    let settings = SyncSettings::from(&config.sync);
    assert_eq!(settings.throttle, Duration::from_millis(200));
    assert_eq!(settings.deferred_delay, Duration::from_millis(201));
    assert_eq!(settings.local_key, "packs");
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let (_dir, path) = temp_config("[sync\nthrottle_ms = ");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_zero_throttle_fails_validation() {
    let (_dir, path) = temp_config("[sync]\nthrottle_ms = 0\n");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
}

#[test]
fn test_empty_base_url_fails_validation() {
    let mut config = Config::default();
    config.remote.base_url = "  ".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("remote.base_url"));
}

#[test]
fn test_local_key_must_be_a_valid_file_name() {
    let (_dir, path) = temp_config("[sync]\nlocal_key = \"library.v2\"\n");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("library.v2"));

    let (_dir, path) = temp_config("[sync]\nlocal_key = \"library_v2-b\"\n");
    assert_eq!(Config::load_from(&path).unwrap().sync.local_key, "library_v2-b");
}
