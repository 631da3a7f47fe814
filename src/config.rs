// SPDX-License-Identifier: MPL-2.0

//! Configuration shared by the overlay and the panel applet
//!
//! The applet writes requests into this entry and the overlay polls it, so
//! both processes agree on visibility without any other IPC channel.

use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// cosmic-config id under which the entry is stored.
pub const CONFIG_ID: &str = "com.github.cosmic.NetspeedOverlay";

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Requested overlay visibility, toggled from the applet menu
    pub overlay_visible: bool,
    /// Set by the applet's "Exit" entry, cleared by the overlay on shutdown
    pub exit_requested: bool,
    /// Left offset of the overlay in logical pixels
    pub overlay_x: i32,
    /// Top offset of the overlay in logical pixels
    pub overlay_y: i32,
    /// True while an overlay process is polling this entry
    pub overlay_running: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overlay_visible: true,
            exit_requested: false,
            overlay_x: 10,
            overlay_y: 20,
            overlay_running: false,
        }
    }
}

impl Config {
    /// Opens the config handler and reads the current entry.
    ///
    /// Keys that are missing or fail to parse fall back to their defaults.
    pub fn load() -> Result<(cosmic_config::Config, Self), cosmic_config::Error> {
        let handler = cosmic_config::Config::new(CONFIG_ID, Self::VERSION)?;
        // Keys are missing until the first write, so this is not worth a warning.
        let config = Self::or_fallback(Self::get_entry(&handler), log::Level::Debug);
        Ok((handler, config))
    }

    /// Re-reads the entry, keeping every key that parsed.
    pub fn read(handler: &cosmic_config::Config) -> Self {
        Self::or_fallback(Self::get_entry(handler), log::Level::Warn)
    }

    fn or_fallback<E: Display>(entry: Result<Self, (Vec<E>, Self)>, level: log::Level) -> Self {
        match entry {
            Ok(config) => config,
            Err((errors, config)) => {
                for err in errors {
                    log::log!(level, "config key fell back to default: {err}");
                }
                config
            }
        }
    }

    /// Whether an overlay is around to act on applet requests.
    pub fn accepts_requests(&self) -> bool {
        self.overlay_running && !self.exit_requested
    }

    /// Writes the entry, logging instead of failing.
    pub fn store(&self, handler: &cosmic_config::Config) {
        if let Err(err) = self.write_entry(handler) {
            log::warn!("failed to write config: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_start_visible_at_fixed_offset() {
        let config = Config::default();
        assert!(config.overlay_visible);
        assert!(!config.exit_requested);
        assert_eq!((config.overlay_x, config.overlay_y), (10, 20));
        assert!(!config.overlay_running);
    }

    #[test]
    fn partial_read_keeps_parsed_keys() {
        let partial = Config {
            exit_requested: true,
            overlay_running: true,
            ..Config::default()
        };
        let entry = Err((vec!["overlay_x: invalid type".to_string()], partial.clone()));
        assert_eq!(Config::or_fallback(entry, log::Level::Warn), partial);
    }

    #[test]
    fn complete_read_is_used_as_is() {
        let config = Config {
            overlay_visible: false,
            ..Config::default()
        };
        let entry: Result<Config, (Vec<String>, Config)> = Ok(config.clone());
        assert_eq!(Config::or_fallback(entry, log::Level::Warn), config);
    }

    #[test]
    fn requests_need_a_running_overlay() {
        let stopped = Config::default();
        assert!(!stopped.accepts_requests());

        let running = Config {
            overlay_running: true,
            ..Config::default()
        };
        assert!(running.accepts_requests());

        let exiting = Config {
            exit_requested: true,
            ..running
        };
        assert!(!exiting.accepts_requests());
    }
}
