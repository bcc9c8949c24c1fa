//! INI file loading for tile source configurations.
//!
//! A tile source file has a `[source]` section for the core settings and
//! an optional `[extra_url_vars]` section whose keys are substituted into
//! every formatted URL:
//!
//! ```ini
//! [source]
//! url = https://tiles.example.com/{z}/{x}/{y}.png
//! tile_size = 256
//! min_zoom = 0
//! max_zoom = 19
//! wrap_around = true
//! snap_to_zoom = false
//! attribution = © Example Imagery
//!
//! [extra_url_vars]
//! apikey = abc123
//! ```

use std::path::Path;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use super::{ConfigError, TileSourceConfig};

/// Errors raised while loading a tile source file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the INI file
    #[error("Failed to read tile source file: {0}")]
    ReadError(#[from] ini::Error),

    /// A required key is absent
    #[error("Missing required key: [{section}] {key}")]
    MissingKey { section: String, key: String },

    /// A key is present but its value does not parse
    #[error("Invalid value: [{section}] {key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// The parsed values form an invalid configuration
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

impl TileSourceConfig {
    /// Loads a tile source configuration from an INI file.
    ///
    /// Missing optional keys fall back to the reference defaults; the
    /// `url` key is required.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_file(path)?;
        let config = parse_ini(&ini)?;
        debug!(
            path = %path.display(),
            url = %config.url,
            min_zoom = config.min_zoom,
            max_zoom = config.max_zoom,
            "loaded tile source configuration"
        );
        Ok(config)
    }
}

fn parse_ini(ini: &Ini) -> Result<TileSourceConfig, ConfigFileError> {
    let section = ini
        .section(Some("source"))
        .ok_or_else(|| ConfigFileError::MissingKey {
            section: "source".to_string(),
            key: "url".to_string(),
        })?;

    let url = section
        .get("url")
        .ok_or_else(|| ConfigFileError::MissingKey {
            section: "source".to_string(),
            key: "url".to_string(),
        })?;

    let mut config = TileSourceConfig::new(url)?;

    if let Some(v) = section.get("tile_size") {
        config.tile_size = parse_key(v, "tile_size", "expected a positive pixel count")?;
    }

    let mut min_zoom = config.min_zoom;
    let mut max_zoom = config.max_zoom;
    if let Some(v) = section.get("min_zoom") {
        min_zoom = parse_key(v, "min_zoom", "expected an integer zoom level")?;
    }
    if let Some(v) = section.get("max_zoom") {
        max_zoom = parse_key(v, "max_zoom", "expected an integer zoom level")?;
    }
    config = config.with_zoom_range(min_zoom, max_zoom)?;

    if let Some(v) = section.get("wrap_around") {
        config.wrap_around = parse_key(v, "wrap_around", "expected true or false")?;
    }
    if let Some(v) = section.get("snap_to_zoom") {
        config.snap_to_zoom = parse_key(v, "snap_to_zoom", "expected true or false")?;
    }
    if let Some(v) = section.get("initial_resolution") {
        config.initial_resolution =
            parse_key(v, "initial_resolution", "expected meters per pixel")?;
    }
    if let Some(v) = section.get("x_origin_offset") {
        config.x_origin_offset = parse_key(v, "x_origin_offset", "expected meters")?;
    }
    if let Some(v) = section.get("y_origin_offset") {
        config.y_origin_offset = parse_key(v, "y_origin_offset", "expected meters")?;
    }
    if let Some(v) = section.get("attribution") {
        config.attribution = v.to_string();
    }

    if let Some(vars) = ini.section(Some("extra_url_vars")) {
        for (key, value) in vars.iter() {
            config
                .extra_url_vars
                .insert(key.to_string(), value.to_string());
        }
    }

    Ok(config)
}

fn parse_key<T: std::str::FromStr>(
    value: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: "source".to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_source_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_load_full_source_file() {
        let file = write_source_file(
            "[source]\n\
             url = https://tiles.example.com/{z}/{x}/{y}.png\n\
             tile_size = 512\n\
             min_zoom = 2\n\
             max_zoom = 19\n\
             wrap_around = false\n\
             snap_to_zoom = true\n\
             attribution = Example Imagery\n\
             \n\
             [extra_url_vars]\n\
             apikey = abc123\n",
        );

        let config = TileSourceConfig::load_from(file.path()).unwrap();
        assert_eq!(config.url, "https://tiles.example.com/{Z}/{X}/{Y}.png");
        assert_eq!(config.tile_size, 512);
        assert_eq!(config.min_zoom, 2);
        assert_eq!(config.max_zoom, 19);
        assert!(!config.wrap_around);
        assert!(config.snap_to_zoom);
        assert_eq!(config.attribution, "Example Imagery");
        assert_eq!(config.extra_url_vars.get("apikey").unwrap(), "abc123");
    }

    #[test]
    fn test_defaults_when_keys_absent() {
        let file = write_source_file("[source]\nurl = http://t/{x}.png\n");
        let config = TileSourceConfig::load_from(file.path()).unwrap();
        assert_eq!(config.tile_size, 256);
        assert!(config.wrap_around);
        assert!(config.extra_url_vars.is_empty());
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let file = write_source_file("[source]\ntile_size = 256\n");
        let result = TileSourceConfig::load_from(file.path());
        assert!(matches!(
            result.unwrap_err(),
            ConfigFileError::MissingKey { .. }
        ));
    }

    #[test]
    fn test_unparseable_value_is_an_error() {
        let file = write_source_file("[source]\nurl = http://t/{x}.png\ntile_size = huge\n");
        let result = TileSourceConfig::load_from(file.path());
        assert!(matches!(
            result.unwrap_err(),
            ConfigFileError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_inverted_zoom_range_in_file_is_rejected() {
        let file = write_source_file(
            "[source]\nurl = http://t/{x}.png\nmin_zoom = 12\nmax_zoom = 4\n",
        );
        let result = TileSourceConfig::load_from(file.path());
        assert!(matches!(result.unwrap_err(), ConfigFileError::Invalid(_)));
    }
}
