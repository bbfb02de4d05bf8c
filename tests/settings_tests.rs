mod common;

use common::setup_logging;
use friendbridge::settings::{load_settings_from, save_settings_to, AccountSettings};
use tempfile::tempdir;

#[test]
fn test_settings_round_trip() {
    setup_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut settings = AccountSettings::new("Brutus Buckeye", "brutus.1@osu.edu");
    settings.match_preferences.raise();
    settings.match_preferences.raise();
    save_settings_to(&path, &settings).unwrap();

    let loaded = load_settings_from(&path).unwrap().unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.match_preferences.min_compatibility, Some(55));
}

#[test]
fn test_missing_settings_file_is_none() {
    let dir = tempdir().unwrap();
    let loaded = load_settings_from(&dir.path().join("settings.json")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_unset_preference_not_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    save_settings_to(&path, &AccountSettings::new("Testudo", "testudo.9@buckeyemail.osu.edu")).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["university"], "Ohio State University");
    assert!(json["match_preferences"].get("min_compatibility").is_none());
}

#[test]
fn test_corrupt_settings_file_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_settings_from(&path).is_err());
}
