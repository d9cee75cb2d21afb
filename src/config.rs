//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/netfire/netfire.toml`
//! 3. Explicit config file (`--config <FILE>`)
//! 4. Environment variables: `NETFIRE_*` prefix, `__` between table and key

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Session loop behaviour shared by both programs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionSettings {
    /// Every rejected command ends the session with a non-zero exit status
    pub strict: bool,
}

/// escape-networks settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EscapeSettings {
    /// Remember flow values per (network, source, sink) until the network changes
    pub cache_flows: bool,
}

impl Default for EscapeSettings {
    fn default() -> Self {
        Self { cache_flows: true }
    }
}

/// fire-breaker settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FireSettings {
    /// Containment commands accepted between two spread turns, 0 for no limit
    pub protect_commands_per_turn: u32,
}

impl Default for FireSettings {
    fn default() -> Self {
        Self {
            protect_commands_per_turn: 1,
        }
    }
}

/// Unified configuration for netfire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub session: SessionSettings,
    pub escape: EscapeSettings,
    pub fire: FireSettings,
}

/// Get the XDG config directory for netfire.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "netfire").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("netfire.toml"))
}

impl Settings {
    /// Load settings from all layers.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), explicit)
    }

    /// Layered load with an explicit global file location.
    pub fn load_from(global: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("session.strict", defaults.session.strict)
            .map_err(config_err)?
            .set_default("escape.cache_flows", defaults.escape.cache_flows)
            .map_err(config_err)?
            .set_default(
                "fire.protect_commands_per_turn",
                i64::from(defaults.fire.protect_commands_per_turn),
            )
            .map_err(config_err)?;

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                builder = builder.add_source(
                    File::from(global_path)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        if let Some(path) = explicit {
            debug!("load: explicit config {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("NETFIRE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# netfire configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/netfire/netfire.toml
#   Explicit: netfire --config <FILE>
#   Env:      NETFIRE_<TABLE>__<KEY>, e.g. NETFIRE_SESSION__STRICT=true

[session]
# Treat every rejected command as fatal (exit status 65)
# strict = false

[escape]
# Cache flow values until the network changes
# cache_flows = true

[fire]
# Containment commands accepted per turn (0 = unlimited)
# protect_commands_per_turn = 1
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_files_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, None).expect("load defaults");
        assert!(settings.escape.cache_flows);
        assert_eq!(settings.fire.protect_commands_per_turn, 1);
    }

    #[test]
    fn given_defaults_when_serialized_then_template_keys_match() {
        let toml = Settings::default().to_toml().unwrap();
        let template = Settings::template();

        for key in ["strict", "cache_flows", "protect_commands_per_turn"] {
            assert!(toml.contains(key), "missing {key} in effective config");
            assert!(template.contains(key), "missing {key} in template");
        }
    }

    #[test]
    fn given_template_when_parsed_then_equals_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
