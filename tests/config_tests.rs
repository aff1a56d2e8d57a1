mod common;

use common::setup_json_env;
use donation_core::config::{Config, ConfigError};

#[test]
fn missing_file_loads_defaults() {
    let (_temp, _, manager) = setup_json_env();
    assert!(!manager.path().exists());
    let config = manager.load().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.currency_symbol, "₹");
    assert_eq!(config.locale, "en-IN");
}

#[test]
fn saved_preferences_round_trip_through_disk() {
    let (_temp, _, manager) = setup_json_env();
    let mut config = manager.load().unwrap();
    config.set("currency_symbol", "€").unwrap();
    config.set("last_email", "donor@example.com").unwrap();
    config.set("ui_color_enabled", "no").unwrap();
    manager.save(&config).unwrap();

    assert!(manager.path().ends_with("config/config.json"));
    let reloaded = manager.load().unwrap();
    assert_eq!(reloaded, config);
    assert!(!reloaded.ui_color_enabled);

    let raw = std::fs::read_to_string(manager.path()).unwrap();
    assert!(!raw.contains("wallet_address"));
    let temp_file = manager.path().with_extension("tmp");
    assert!(!temp_file.exists());
}

#[test]
fn corrupt_file_is_reported() {
    let (_temp, _, manager) = setup_json_env();
    std::fs::write(manager.path(), "{ not json").unwrap();
    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}

#[test]
fn entries_cover_every_key() {
    let config = Config::default();
    let keys: Vec<&str> = config.entries().into_iter().map(|(key, _)| key).collect();
    assert_eq!(keys, Config::KEYS.to_vec());
}
