use parley_core::config::{DEFAULT_ENDPOINT, RootConfig};
use parley_infrastructure::ConfigService;
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

    let config = service.load_file().expect("Should load defaults");

    assert_eq!(config, RootConfig::default());
    assert_eq!(config.client.endpoint, DEFAULT_ENDPOINT);
}

#[test]
fn test_file_values_are_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[client]
endpoint = "http://chat.internal:8080/generate"
request_timeout_secs = 30

[server]
allowed_origins = ["https://chat.example.com"]

[logging]
level = "parley_application=debug"
"#,
    )
    .unwrap();

    let config = ConfigService::with_path(&config_path)
        .load_file()
        .expect("Should parse config");

    assert_eq!(config.client.endpoint, "http://chat.internal:8080/generate");
    assert_eq!(config.client.request_timeout_secs, Some(30));
    assert_eq!(config.server.allowed_origins, vec!["https://chat.example.com"]);
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.logging.level, "parley_application=debug");
}

#[test]
fn test_malformed_file_is_serialization_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[client\nendpoint = ").unwrap();

    let err = ConfigService::with_path(&config_path)
        .load_file()
        .unwrap_err();

    assert!(err.is_serialization());
}
