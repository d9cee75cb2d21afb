//! Integration tests for layered Settings loading.
//!
//! These tests point the global layer at temp files, so the machine's own
//! `~/.config/netfire/netfire.toml` never leaks in.

use std::fs;

use tempfile::TempDir;

use netfire::application::ApplicationError;
use netfire::config::Settings;

// ============================================================
// File layers
// ============================================================

#[test]
fn given_global_file_when_loading_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("netfire.toml");
    fs::write(&global, "[escape]\ncache_flows = false\n").unwrap();

    // Act
    let settings = Settings::load_from(Some(global.as_path()), None).expect("load settings");

    // Assert
    assert!(!settings.escape.cache_flows);
    assert!(!settings.session.strict);
}

#[test]
fn given_explicit_file_when_loading_then_wins_over_global() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("global.toml");
    let explicit = dir.path().join("explicit.toml");
    fs::write(&global, "[session]\nstrict = false\n[escape]\ncache_flows = false\n").unwrap();
    fs::write(&explicit, "[session]\nstrict = true\n").unwrap();

    let settings = Settings::load_from(Some(global.as_path()), Some(explicit.as_path())).expect("load settings");

    assert!(settings.session.strict, "explicit file should win");
    assert!(!settings.escape.cache_flows, "global value should survive");
}

#[test]
fn given_missing_global_file_when_loading_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load_from(Some(dir.path().join("absent.toml").as_path()), None).expect("load settings");

    assert!(settings.escape.cache_flows);
}

#[test]
fn given_missing_explicit_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load_from(None, Some(dir.path().join("absent.toml").as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_malformed_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("bad.toml");
    fs::write(&explicit, "[escape]\ncache_flows = \"maybe\"\n").unwrap();

    let result = Settings::load_from(None, Some(explicit.as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

// ============================================================
// Environment layer
// ============================================================

#[test]
fn given_env_var_when_loading_then_overrides_files() {
    // the only test in this binary that touches NETFIRE_* variables
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("explicit.toml");
    fs::write(&explicit, "[fire]\nprotect_commands_per_turn = 2\n").unwrap();
    std::env::set_var("NETFIRE_FIRE__PROTECT_COMMANDS_PER_TURN", "5");

    let settings = Settings::load_from(None, Some(explicit.as_path()));
    std::env::remove_var("NETFIRE_FIRE__PROTECT_COMMANDS_PER_TURN");

    assert_eq!(settings.expect("load settings").fire.protect_commands_per_turn, 5);
}

#[test]
fn given_effective_settings_when_rendered_then_reloadable() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("rendered.toml");
    let mut settings = Settings::default();
    settings.session.strict = true;
    settings.escape.cache_flows = false;
    fs::write(&explicit, settings.to_toml().unwrap()).unwrap();

    let reloaded = Settings::load_from(None, Some(explicit.as_path())).expect("load settings");

    assert!(reloaded.session.strict);
    assert!(!reloaded.escape.cache_flows);
}
