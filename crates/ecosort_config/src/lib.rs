//! EcoSort configuration.
//!
//! Design goals:
//! - Strongly typed sections (each section is one struct with a `SECTION` name).
//! - Defaults live in `Default` impls; the file on disk is a single RON
//!   document and may contain any subset of fields (`#[serde(default)]`).
//! - Loading is lenient: a missing file is written with defaults, an
//!   unreadable file logs a warning and falls back to defaults without
//!   touching what is on disk.
//!
//! The config is read once at startup; nothing edits it at runtime.

#[cfg(feature = "bevy")]
pub mod bevy;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Marker for one named config section.
pub trait ConfigSection: Default {
    const SECTION: &'static str;
}

/* ------------------------------------------------------------------------- */
/* Section Models                                                            */
/* ------------------------------------------------------------------------- */

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
#[cfg_attr(feature = "bevy", derive(::bevy::prelude::Resource))]
pub struct General {
    pub window_title: String,
    /// Skip the simulated sign-in and boot straight into the tabs.
    pub start_signed_in: bool,
}

impl Default for General {
    fn default() -> Self {
        Self {
            window_title: "EcoSort".into(),
            start_signed_in: false,
        }
    }
}
impl ConfigSection for General {
    const SECTION: &'static str = "general";
}

/// Knobs of the simulated platform and analysis layers. All durations in
/// seconds.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
#[cfg_attr(feature = "bevy", derive(::bevy::prelude::Resource))]
pub struct Simulation {
    pub analysis_delay_secs: f32,
    pub sign_in_delay_secs: f32,
    pub capture_latency_secs: f32,
    pub library_latency_secs: f32,
    pub location_latency_secs: f32,
    /// Force every capture to fail, for exercising the notice path.
    pub fail_captures: bool,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            analysis_delay_secs: 2.0,
            sign_in_delay_secs: 1.5,
            capture_latency_secs: 0.35,
            library_latency_secs: 0.5,
            location_latency_secs: 0.8,
            fail_captures: false,
        }
    }
}
impl ConfigSection for Simulation {
    const SECTION: &'static str = "simulation";
}

/// The mock geocoding result the location provider resolves to.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
#[cfg_attr(feature = "bevy", derive(::bevy::prelude::Resource))]
pub struct Location {
    pub region_label: String,
    pub lat: f64,
    pub lon: f64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            region_label: "Yeoksam-dong, Gangnam-gu, Seoul".into(),
            lat: 37.4979,
            lon: 127.0276,
        }
    }
}
impl ConfigSection for Location {
    const SECTION: &'static str = "location";
}

/* ------------------------------------------------------------------------- */
/* Document                                                                  */
/* ------------------------------------------------------------------------- */

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct EcosortConfig {
    pub general: General,
    pub simulation: Simulation,
    pub location: Location,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

impl EcosortConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(ron::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let pretty = ron::ser::PrettyConfig::default();
        let raw = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Loads the config, writing defaults on first run. A file that fails to
    /// parse is left untouched and defaults are used for this session.
    pub fn load_or_init(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            if let Err(err) = config.save(path) {
                tracing::warn!("could not write default config to {path:?}: {err}");
            }
            return config;
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring unreadable config at {path:?}: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_simulated_product() {
        let config = EcosortConfig::default();
        assert_eq!(config.general.window_title, "EcoSort");
        assert_eq!(config.simulation.analysis_delay_secs, 2.0);
        assert_eq!(config.simulation.sign_in_delay_secs, 1.5);
        assert!(!config.simulation.fail_captures);
        assert_eq!(config.location.region_label, "Yeoksam-dong, Gangnam-gu, Seoul");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecosort.settings.ron");

        let mut config = EcosortConfig::default();
        config.simulation.analysis_delay_secs = 0.1;
        config.general.start_signed_in = true;
        config.save(&path).unwrap();

        let loaded = EcosortConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ecosort.settings.ron");

        let config = EcosortConfig::load_or_init(&path);
        assert_eq!(config, EcosortConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn partial_file_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.ron");
        fs::write(&path, "(simulation: (analysis_delay_secs: 0.25))").unwrap();

        let config = EcosortConfig::load(&path).unwrap();
        assert_eq!(config.simulation.analysis_delay_secs, 0.25);
        // Untouched fields keep their defaults.
        assert_eq!(config.simulation.sign_in_delay_secs, 1.5);
        assert_eq!(config.general, General::default());
    }

    #[test]
    fn broken_file_falls_back_to_defaults_without_clobbering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "this is not ron {{{").unwrap();

        let config = EcosortConfig::load_or_init(&path);
        assert_eq!(config, EcosortConfig::default());
        // The broken file stays as-is for the user to inspect.
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("this is not ron"));
    }

    #[test]
    fn section_names_are_stable() {
        assert_eq!(General::SECTION, "general");
        assert_eq!(Simulation::SECTION, "simulation");
        assert_eq!(Location::SECTION, "location");
    }
}
