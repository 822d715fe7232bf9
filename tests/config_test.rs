//! Integration tests for configuration loading and saving.

use ergodrive::config::{load_config_from, save_config_to, AppConfig, ConfigError};
use ergodrive::GearLayout;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.drivetrain.preset, "standard");
    assert_eq!(config.rider.mass_kg, 75.0);
    assert!(!config.rider.erg_mode);
}

#[test]
fn test_save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = AppConfig::default();
    config.rider.mass_kg = 82.5;
    config.rider.erg_mode = true;
    config.drivetrain.preset = "compact".to_string();
    config.drivetrain.sprockets = Some(vec![28, 24, 21, 19, 17, 15, 13, 11]);

    save_config_to(&config, &path).unwrap();
    let loaded = load_config_from(&path).unwrap();

    assert_eq!(loaded.rider.mass_kg, 82.5);
    assert!(loaded.rider.erg_mode);
    assert_eq!(loaded.drivetrain.preset, "compact");
    assert_eq!(
        loaded.gear_layout().unwrap().sprockets,
        vec![28, 24, 21, 19, 17, 15, 13, 11]
    );
    assert_eq!(
        loaded.gear_layout().unwrap().chainrings,
        GearLayout::compact().chainrings
    );
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "rider = not toml {").unwrap();

    assert!(matches!(
        load_config_from(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_loaded_unknown_preset_fails_at_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[drivetrain]\npreset = \"tandem\"\n").unwrap();

    let config = load_config_from(&path).unwrap();
    assert!(matches!(
        config.gear_layout(),
        Err(ConfigError::UnknownPreset(_))
    ));
}
