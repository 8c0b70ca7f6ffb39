//! Integration tests for vault-config's settings load/parse pipeline.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::fs;

use vault_config::{ConfigError, Settings};

#[test]
fn load_round_trips_a_fully_populated_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    let mut settings = Settings::default();
    settings.search.preserve_diacritics = false;
    settings.search.exclude_folders = vec![".git".to_string(), "node_modules".to_string()];
    settings.indexer.max_docs = 1_000;
    settings.indexer.batch_size = 25;
    settings.coalescer.debounce_ms = 750;

    fs::write(&path, settings.to_toml()).unwrap();

    let loaded = Settings::load(&path).expect("round-trip load should succeed");
    assert!(!loaded.search.preserve_diacritics);
    assert_eq!(loaded.search.exclude_folders, vec![".git".to_string(), "node_modules".to_string()]);
    assert_eq!(loaded.indexer.max_docs, 1_000);
    assert_eq!(loaded.indexer.batch_size, 25);
    assert_eq!(loaded.coalescer.debounce_ms, 750);
}

#[test]
fn load_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let err = Settings::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("failed to read settings file"));
}

#[test]
fn load_malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "[search\nbroken").unwrap();

    let err = Settings::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
    assert!(err.to_string().contains("failed to parse settings file"));
}

#[test]
fn partial_settings_file_fills_in_defaults_for_omitted_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "[search]\nregex_candidate_k = 42\n").unwrap();

    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded.search.regex_candidate_k, 42);
    assert_eq!(loaded.indexer.max_docs, vault_config::DEFAULT_MAX_DOCS);
    assert_eq!(loaded.coalescer.debounce_ms, vault_config::DEFAULT_COALESCER_DEBOUNCE_MS);
}

#[test]
fn empty_file_parses_to_all_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "").unwrap();

    let loaded = Settings::load(&path).unwrap();
    let defaults = Settings::default();
    assert_eq!(loaded.indexer.max_docs, defaults.indexer.max_docs);
    assert_eq!(loaded.search.weights.title, defaults.search.weights.title);
}
