//! Mercatile - Web-Mercator raster tile addressing
//!
//! This library provides the coordinate arithmetic a map-rendering client
//! needs to resolve, name, and order raster tiles in a Mercator tile
//! pyramid: geographic/meter/pixel/tile conversions, quadkey encoding,
//! zoom-level selection, URL formatting, and a bounded recycle pool for
//! image decode targets.
//!
//! # High-Level API
//!
//! Most callers build a [`config::TileSourceConfig`], wrap it in a
//! [`grid::TileGrid`], and pair it with a [`url::UrlFormatter`]:
//!
//! ```
//! use mercatile::config::TileSourceConfig;
//! use mercatile::grid::{TileGrid, DEFAULT_TILE_BORDER};
//! use mercatile::url::UrlFormatter;
//! use mercatile::coord::Extent;
//!
//! let config = TileSourceConfig::new("https://tiles.example.com/{z}/{x}/{y}.png")
//!     .expect("valid config");
//! let grid = TileGrid::new(config);
//! let formatter = UrlFormatter::Xyz;
//!
//! let view = Extent::new(-20_037_508.34, -20_037_508.34, 20_037_508.34, 20_037_508.34);
//! let level = grid.level_by_extent(&view, 600.0, 800.0);
//! for tile in grid.tiles_by_extent(&view, level, DEFAULT_TILE_BORDER) {
//!     let _url = formatter.image_url(&grid, tile.coord);
//! }
//! ```
//!
//! Actual fetching, decoding, and drawing are owned by the caller; this
//! crate stops at the URL string and the reusable decode buffer.

pub mod config;
pub mod coord;
pub mod grid;
pub mod logging;
pub mod pool;
pub mod projection;
pub mod url;

/// Version of the mercatile library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
