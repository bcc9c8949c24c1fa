//! Tile source configuration
//!
//! [`TileSourceConfig`] is the immutable description of one raster tile
//! source: its URL template, tile geometry, zoom range, and wraparound /
//! snapping behavior. It is constructed once and never mutated afterwards;
//! the only transformation applied is URL template normalization, which
//! happens a single time at construction rather than on every request.
//!
//! Configs can also be loaded from an INI file, see [`TileSourceConfig::load_from`].

mod file;

use std::collections::HashMap;
use thiserror::Error;

use crate::coord::{DEFAULT_INITIAL_RESOLUTION, MAX_ZOOM, MIN_ZOOM, ORIGIN_SHIFT};

pub use file::ConfigFileError;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// max_zoom is below min_zoom
    #[error("Invalid zoom range: max_zoom ({max_zoom}) must be >= min_zoom ({min_zoom})")]
    InvalidZoomRange { min_zoom: u8, max_zoom: u8 },

    /// max_zoom is deeper than the supported pyramid
    #[error("Invalid zoom range: max_zoom ({max_zoom}) is beyond the deepest supported level (30)")]
    ZoomRangeTooDeep { max_zoom: u8 },
}

/// Immutable configuration for a Web-Mercator raster tile source.
///
/// # Example
///
/// ```
/// use mercatile::config::TileSourceConfig;
///
/// let config = TileSourceConfig::new("https://tiles.example.com/{z}/{x}/{y}.png")
///     .unwrap()
///     .with_wrap_around(false)
///     .with_zoom_range(0, 19)
///     .unwrap();
/// assert_eq!(config.url, "https://tiles.example.com/{Z}/{X}/{Y}.png");
/// ```
#[derive(Debug, Clone)]
pub struct TileSourceConfig {
    /// URL template with placeholder tokens, normalized to the canonical
    /// uppercase token forms (`{X}`, `{Y}`, `{Z}`, `{Q}`, `{XMIN}`,
    /// `{YMIN}`, `{XMAX}`, `{YMAX}`) at construction
    pub url: String,
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Coarsest zoom level served by the source
    pub min_zoom: u8,
    /// Finest zoom level served by the source
    pub max_zoom: u8,
    /// Treat the x (longitude) tile axis as cyclic
    pub wrap_around: bool,
    /// Snap view extents to exact zoom-level resolutions
    pub snap_to_zoom: bool,
    /// Projection origin offset on the x axis, in meters
    pub x_origin_offset: f64,
    /// Projection origin offset on the y axis, in meters
    pub y_origin_offset: f64,
    /// Meters per pixel at zoom 0
    pub initial_resolution: f64,
    /// Attribution text for the imagery, carried opaquely for display
    pub attribution: String,
    /// Caller-supplied static template variables (API keys, layer names)
    pub extra_url_vars: HashMap<String, String>,
}

impl TileSourceConfig {
    /// Creates a configuration with reference defaults for the given URL
    /// template.
    ///
    /// Lowercase placeholder tokens in the template are normalized to
    /// their canonical uppercase forms here, once.
    ///
    /// # Errors
    ///
    /// Infallible today (the default zoom range is valid); returns
    /// `Result` so that future construction-time validation does not
    /// break callers.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            url: normalize_url_template(&url.into()),
            tile_size: DEFAULT_TILE_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wrap_around: true,
            snap_to_zoom: false,
            x_origin_offset: ORIGIN_SHIFT,
            y_origin_offset: ORIGIN_SHIFT,
            initial_resolution: DEFAULT_INITIAL_RESOLUTION,
            attribution: String::new(),
            extra_url_vars: HashMap::new(),
        };
        config.validate()
    }

    /// Sets the zoom range served by the source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidZoomRange`] if `max_zoom < min_zoom`,
    /// and [`ConfigError::ZoomRangeTooDeep`] if `max_zoom` is beyond
    /// [`MAX_ZOOM`](crate::coord::MAX_ZOOM), the deepest level the
    /// pyramid arithmetic addresses. An out-of-range pair is rejected,
    /// never silently clamped.
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Result<Self, ConfigError> {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.validate()
    }

    /// Sets the tile edge length in pixels.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Enables or disables longitude wraparound.
    pub fn with_wrap_around(mut self, wrap_around: bool) -> Self {
        self.wrap_around = wrap_around;
        self
    }

    /// Enables or disables snapping view extents to zoom-level resolutions.
    pub fn with_snap_to_zoom(mut self, snap_to_zoom: bool) -> Self {
        self.snap_to_zoom = snap_to_zoom;
        self
    }

    /// Sets the meters-per-pixel resolution at zoom 0.
    pub fn with_initial_resolution(mut self, initial_resolution: f64) -> Self {
        self.initial_resolution = initial_resolution;
        self
    }

    /// Sets the projection origin offsets in meters.
    pub fn with_origin_offsets(mut self, x_origin_offset: f64, y_origin_offset: f64) -> Self {
        self.x_origin_offset = x_origin_offset;
        self.y_origin_offset = y_origin_offset;
        self
    }

    /// Sets the attribution text for the imagery.
    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    /// Adds a static template variable substituted into every URL.
    pub fn with_url_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_url_vars.insert(key.into(), value.into());
        self
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.max_zoom < self.min_zoom {
            return Err(ConfigError::InvalidZoomRange {
                min_zoom: self.min_zoom,
                max_zoom: self.max_zoom,
            });
        }
        if self.max_zoom > MAX_ZOOM {
            return Err(ConfigError::ZoomRangeTooDeep {
                max_zoom: self.max_zoom,
            });
        }
        Ok(self)
    }
}

/// Placeholder tokens recognized by the URL formatters, canonical form.
const URL_TOKENS: [&str; 8] = [
    "X", "Y", "Z", "Q", "XMIN", "YMIN", "XMAX", "YMAX",
];

/// Rewrites lowercase placeholder tokens to their canonical uppercase
/// forms. Every occurrence is rewritten; unknown tokens pass through
/// untouched so `extra_url_vars` keys keep their caller-chosen casing.
fn normalize_url_template(url: &str) -> String {
    let mut normalized = url.to_string();
    for token in URL_TOKENS {
        let lower = format!("{{{}}}", token.to_lowercase());
        let upper = format!("{{{}}}", token);
        normalized = normalized.replace(&lower, &upper);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference() {
        let config = TileSourceConfig::new("http://t/{X}/{Y}/{Z}.png").unwrap();
        assert_eq!(config.tile_size, 256);
        assert_eq!(config.min_zoom, 0);
        assert_eq!(config.max_zoom, 30);
        assert!(config.wrap_around);
        assert!(!config.snap_to_zoom);
        assert!((config.x_origin_offset - 20_037_508.342789244).abs() < 1e-6);
        assert!((config.y_origin_offset - 20_037_508.342789244).abs() < 1e-6);
        assert!((config.initial_resolution - 156_543.03392804097).abs() < 1e-9);
    }

    #[test]
    fn test_url_tokens_normalized_once_at_construction() {
        let config =
            TileSourceConfig::new("http://t/{z}/{x}/{y}.png?bbox={xmin},{ymin},{xmax},{ymax}&k={q}")
                .unwrap();
        assert_eq!(
            config.url,
            "http://t/{Z}/{X}/{Y}.png?bbox={XMIN},{YMIN},{XMAX},{YMAX}&k={Q}"
        );
    }

    #[test]
    fn test_url_normalization_preserves_unknown_tokens() {
        let config = TileSourceConfig::new("http://t/{x}/{y}/{z}.png?key={apikey}").unwrap();
        assert!(
            config.url.contains("{apikey}"),
            "caller-defined tokens must keep their casing"
        );
    }

    #[test]
    fn test_inverted_zoom_range_rejected() {
        let result = TileSourceConfig::new("http://t/{X}.png")
            .unwrap()
            .with_zoom_range(10, 3);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidZoomRange {
                min_zoom: 10,
                max_zoom: 3
            })
        ));
    }

    #[test]
    fn test_zoom_range_deeper_than_supported_rejected() {
        let result = TileSourceConfig::new("http://t/{X}.png")
            .unwrap()
            .with_zoom_range(0, 70);
        assert!(matches!(
            result,
            Err(ConfigError::ZoomRangeTooDeep { max_zoom: 70 })
        ));
    }

    #[test]
    fn test_equal_zoom_range_allowed() {
        let config = TileSourceConfig::new("http://t/{X}.png")
            .unwrap()
            .with_zoom_range(5, 5)
            .unwrap();
        assert_eq!(config.min_zoom, 5);
        assert_eq!(config.max_zoom, 5);
    }

    #[test]
    fn test_builder_url_vars() {
        let config = TileSourceConfig::new("http://t/{X}.png?key={API_KEY}")
            .unwrap()
            .with_url_var("API_KEY", "secret");
        assert_eq!(config.extra_url_vars.get("API_KEY").unwrap(), "secret");
    }
}
