//! Coordinate type definitions

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Earth radius in meters used by the spherical Web-Mercator projection
/// (WGS84 ellipsoid flattened to a sphere, consistent with EPSG:3857).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the Mercator circumference in meters; the projection origin offset.
pub const ORIGIN_SHIFT: f64 = std::f64::consts::PI * EARTH_RADIUS;

/// Meters per pixel at zoom 0 for a 256-pixel tile.
pub const DEFAULT_INITIAL_RESOLUTION: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS / 256.0;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Default zoom range of a tile source
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 30;

/// Tile coordinates in the Web Mercator / slippy-map pyramid.
///
/// `z` is the zoom level (0 = whole world in one tile). A *normalized*
/// coordinate satisfies `0 <= x < 2^z` and `0 <= y < 2^z`; `x` and `y`
/// are signed so that wrapped-around and denormalized world coordinates
/// remain representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// X coordinate (west-east)
    pub x: i64,
    /// Y coordinate
    pub y: i64,
    /// Zoom level
    pub z: u8,
}

impl TileCoord {
    /// Creates a tile coordinate.
    #[inline]
    pub fn new(x: i64, y: i64, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Returns the canonical cache-key encoding `"x:y:z"`.
    ///
    /// This is the wire format consumed by external tile registries; it is
    /// the exact inverse of [`TileCoord::from_str`].
    #[inline]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.z)
    }
}

impl FromStr for TileCoord {
    type Err = CoordError;

    /// Parses the `"x:y:z"` cache-key format (decimal integers, colon
    /// separated).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let invalid = || CoordError::InvalidKey(s.to_string());

        let x = parts.next().ok_or_else(invalid)?;
        let y = parts.next().ok_or_else(invalid)?;
        let z = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            x: x.parse().map_err(|_| invalid())?,
            y: y.parse().map_err(|_| invalid())?,
            z: z.parse().map_err(|_| invalid())?,
        })
    }
}

/// Axis-aligned bounding box, `[xmin, ymin, xmax, ymax]`.
///
/// Units are meters or degrees depending on context. Well-formed use
/// requires `xmax > xmin` and `ymax > ymin`; degenerate extents are not
/// rejected here and will propagate NaN/infinity through downstream
/// resolution math.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Extent {
    /// Creates an extent from its corner ordinates.
    #[inline]
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Horizontal span, `xmax - xmin`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Vertical span, `ymax - ymin`.
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// A candidate tile produced by extent enumeration: its coordinate plus
/// its Web-Mercator meter bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    /// Tile coordinate at the enumeration level
    pub coord: TileCoord,
    /// Meter bounds of the tile (bottom-left to top-right)
    pub bounds: Extent,
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Quadkey contains a character outside '0'..='3', or is deeper
    /// than the supported pyramid
    #[error("Invalid quadkey: '{0}' (must be at most 30 digits 0-3)")]
    InvalidQuadkey(String),

    /// Cache key does not match the "x:y:z" format
    #[error("Invalid tile key: '{0}' (expected 'x:y:z' with decimal integers)")]
    InvalidKey(String),
}
