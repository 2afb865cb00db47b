use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Force parameters of the layout simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSettings {
    pub link_distance: f32,
    pub charge: f32,
    pub collision_radius: f32,
    pub ring_spacing: f32,
    pub keep_positions: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            link_distance: 120.0,
            charge: -400.0,
            collision_radius: 50.0,
            ring_spacing: 150.0,
            keep_positions: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub data_file: PathBuf,
    pub export_dir: PathBuf,
    pub export_name: String,
    pub layout: LayoutSettings,
}

/// Values given on the command line; each one overrides the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub data_file: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub export_name: Option<String>,
    pub keep_positions: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    storage: RawStorage,
    #[serde(default)]
    layout: RawLayout,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStorage {
    data_file: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    export_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLayout {
    link_distance: Option<f32>,
    charge: Option<f32>,
    collision_radius: Option<f32>,
    ring_spacing: Option<f32>,
    keep_positions: Option<bool>,
}

impl Config {
    pub fn load(config_file: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let raw = match config_file {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::parse(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => RawConfig::default(),
        };

        Ok(Self::resolve(raw, overrides))
    }

    fn parse(content: &str) -> Result<RawConfig, toml::de::Error> {
        toml::from_str(content)
    }

    fn resolve(raw: RawConfig, overrides: Overrides) -> Self {
        let defaults = LayoutSettings::default();
        let layout = LayoutSettings {
            link_distance: raw.layout.link_distance.unwrap_or(defaults.link_distance),
            charge: raw.layout.charge.unwrap_or(defaults.charge),
            collision_radius: raw
                .layout
                .collision_radius
                .unwrap_or(defaults.collision_radius),
            ring_spacing: raw.layout.ring_spacing.unwrap_or(defaults.ring_spacing),
            keep_positions: overrides.keep_positions
                || raw.layout.keep_positions.unwrap_or(defaults.keep_positions),
        };

        Self {
            data_file: overrides
                .data_file
                .or(raw.storage.data_file)
                .unwrap_or_else(default_data_file),
            export_dir: overrides
                .export_dir
                .or(raw.storage.export_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            export_name: overrides
                .export_name
                .or(raw.storage.export_name)
                .unwrap_or_else(|| "mindmap-export.json".to_owned()),
            layout,
        }
    }
}

fn default_data_file() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("mindmap-explorer").join("mindmap.json"),
        None => PathBuf::from("mindmap.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::resolve(RawConfig::default(), Overrides::default());
        assert_eq!(config.layout, LayoutSettings::default());
        assert_eq!(config.export_name, "mindmap-export.json");
        assert!(config.data_file.ends_with("mindmap.json"));
    }

    #[test]
    fn file_values_fill_in_and_cli_wins() {
        let raw = Config::parse(
            r#"
            [storage]
            data_file = "/srv/mindmap.json"
            export_name = "from-file.json"

            [layout]
            charge = -250.0
            ring_spacing = 90.0
            "#,
        )
        .expect("valid toml");

        let config = Config::resolve(
            raw,
            Overrides {
                export_name: Some("from-cli.json".to_owned()),
                keep_positions: true,
                ..Overrides::default()
            },
        );

        assert_eq!(config.data_file, PathBuf::from("/srv/mindmap.json"));
        assert_eq!(config.export_name, "from-cli.json");
        assert_eq!(config.layout.charge, -250.0);
        assert_eq!(config.layout.ring_spacing, 90.0);
        assert_eq!(config.layout.link_distance, 120.0);
        assert!(config.layout.keep_positions);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[layout]\ngravity = 3.0\n").is_err());
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = Config::load(Some(&dir.path().join("absent.toml")), Overrides::default())
            .expect_err("file is absent");
        assert!(matches!(error, ConfigError::Read { .. }));
    }
}
