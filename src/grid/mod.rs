//! Tile addressing over a Mercator pyramid
//!
//! [`TileGrid`] binds a [`TileSourceConfig`] to its precomputed
//! [`ResolutionPyramid`] and provides every configuration-dependent
//! coordinate operation: pixel/meter/tile conversions, tile bounds,
//! validity, extent-to-tile enumeration, zoom-level selection, zoom
//! snapping, and closest-known-ancestor lookup.
//!
//! All operations are pure, synchronous, and lock-free; a `TileGrid` is
//! immutable after construction and may be shared freely across threads.

mod pyramid;

pub use pyramid::ResolutionPyramid;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::config::TileSourceConfig;
use crate::coord::{self, Extent, TileBounds, TileCoord};
use crate::projection;

/// Extra ring of tiles fetched around a view extent so panning has
/// imagery ready at the edges.
pub const DEFAULT_TILE_BORDER: u32 = 1;

/// Read-only view of the externally owned "known tiles" registry.
///
/// The renderer owns tile storage; ancestor lookup only needs membership
/// queries against the `"x:y:z"` cache keys, so that is all this trait
/// exposes.
pub trait TileRegistry {
    /// Returns true if a tile with the given cache key is known.
    fn contains_key(&self, key: &str) -> bool;
}

impl TileRegistry for HashSet<String> {
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }
}

impl<V> TileRegistry for HashMap<String, V> {
    fn contains_key(&self, key: &str) -> bool {
        HashMap::contains_key(self, key)
    }
}

/// Tile addressing engine for one configured Mercator tile source.
#[derive(Debug, Clone)]
pub struct TileGrid {
    config: TileSourceConfig,
    pyramid: ResolutionPyramid,
}

impl TileGrid {
    /// Creates a grid for the given source, computing its resolution
    /// pyramid once. The config's zoom range was validated at
    /// construction, so this cannot fail.
    pub fn new(config: TileSourceConfig) -> Self {
        let pyramid = ResolutionPyramid::new(
            config.initial_resolution,
            config.min_zoom,
            config.max_zoom,
        );
        Self { config, pyramid }
    }

    /// The source configuration this grid addresses.
    pub fn config(&self) -> &TileSourceConfig {
        &self.config
    }

    /// The precomputed resolution pyramid.
    pub fn pyramid(&self) -> &ResolutionPyramid {
        &self.pyramid
    }

    /// Meters per pixel at the given zoom level:
    /// `initial_resolution / 2^level`.
    #[inline]
    pub fn resolution(&self, level: u8) -> f64 {
        self.config.initial_resolution / 2_f64.powi(level as i32)
    }

    /// Converts pyramid pixel coordinates at a zoom level to
    /// Web-Mercator meters.
    #[inline]
    pub fn pixels_to_meters(&self, px: f64, py: f64, level: u8) -> (f64, f64) {
        let res = self.resolution(level);
        (
            px * res - self.config.x_origin_offset,
            py * res - self.config.y_origin_offset,
        )
    }

    /// Converts Web-Mercator meters to pyramid pixel coordinates at a
    /// zoom level. Exact algebraic inverse of [`TileGrid::pixels_to_meters`].
    #[inline]
    pub fn meters_to_pixels(&self, mx: f64, my: f64, level: u8) -> (f64, f64) {
        let res = self.resolution(level);
        (
            (mx + self.config.x_origin_offset) / res,
            (my + self.config.y_origin_offset) / res,
        )
    }

    /// Converts pyramid pixel coordinates to the containing tile indices.
    ///
    /// A pixel exactly on a tile edge belongs to the lower-indexed tile:
    /// the ceil-then-decrement keeps pixel 0 in tile 0 rather than -1,
    /// and the y index is additionally floored at 0.
    #[inline]
    pub fn pixels_to_tile(&self, px: f64, py: f64) -> (i64, i64) {
        let tile_size = self.config.tile_size as f64;

        let tx = (px / tile_size).ceil() as i64;
        let tx = if tx == 0 { tx } else { tx - 1 };

        let ty = ((py / tile_size).ceil() as i64 - 1).max(0);

        (tx, ty)
    }

    /// Converts Web-Mercator meters to the containing tile indices at a
    /// zoom level.
    #[inline]
    pub fn meters_to_tile(&self, mx: f64, my: f64, level: u8) -> (i64, i64) {
        let (px, py) = self.meters_to_pixels(mx, my, level);
        self.pixels_to_tile(px, py)
    }

    /// Returns a tile's bounds in Web-Mercator meters.
    ///
    /// Tile rows use a bottom-left (TMS-style) origin internally: the
    /// extent's min corner is the tile's bottom-left pixel, the max
    /// corner its top-right.
    pub fn tile_meter_bounds(&self, tile: &TileCoord) -> Extent {
        let tile_size = self.config.tile_size as f64;
        let (xmin, ymin) =
            self.pixels_to_meters(tile.x as f64 * tile_size, tile.y as f64 * tile_size, tile.z);
        let (xmax, ymax) = self.pixels_to_meters(
            (tile.x + 1) as f64 * tile_size,
            (tile.y + 1) as f64 * tile_size,
            tile.z,
        );
        Extent::new(xmin, ymin, xmax, ymax)
    }

    /// Returns a tile's bounds in geographic degrees.
    pub fn tile_geographic_bounds(&self, tile: &TileCoord) -> Extent {
        projection::meters_extent_to_geographic(&self.tile_meter_bounds(tile))
    }

    /// Checks whether a tile coordinate addresses a real tile at its
    /// zoom level.
    ///
    /// The y index must always lie in `[0, 2^z)`. The x index must too,
    /// unless wraparound is enabled, in which case any integer x is
    /// valid (it wraps onto the cyclic longitude axis). Zoom levels
    /// beyond [`MAX_ZOOM`](crate::coord::MAX_ZOOM) address no tile at
    /// all. Never fails; out-of-range requests are signalled by `false`,
    /// not an error.
    pub fn is_valid_tile(&self, tile: &TileCoord) -> bool {
        if tile.z > coord::MAX_ZOOM {
            return false;
        }
        let n = 1_i64 << tile.z;
        if !self.config.wrap_around && (tile.x < 0 || tile.x >= n) {
            return false;
        }
        tile.y >= 0 && tile.y < n
    }

    /// Wraps a tile's x index onto the valid range if this source has
    /// wraparound enabled; identity otherwise.
    #[inline]
    pub fn normalize(&self, tile: &TileCoord) -> TileCoord {
        coord::normalize(tile, self.config.wrap_around)
    }

    /// Returns the four children of a tile, each with its meter bounds,
    /// in quadkey digit order.
    pub fn children_with_bounds(&self, tile: &TileCoord) -> [TileBounds; 4] {
        coord::children(tile).map(|child| TileBounds {
            bounds: self.tile_meter_bounds(&child),
            coord: child,
        })
    }

    /// Finds the closest ancestor of a tile that is already present in
    /// the externally owned registry.
    ///
    /// Walks up the pyramid one level at a time, reconstructing each
    /// candidate's unwrapped world coordinate from the original world
    /// index before the membership probe, so a renderer can fall back to
    /// a coarser already-available tile while the precise one loads.
    /// Returns the root tile `(0, 0, 0)` if no ancestor is known.
    pub fn closest_parent(&self, tile: &TileCoord, registry: &impl TileRegistry) -> TileCoord {
        let world_x = coord::world_x(tile);
        let mut current = self.normalize(tile);

        while current.z > 0 {
            current = coord::parent(&current);
            let candidate = coord::denormalize(&current, world_x);
            if registry.contains_key(&candidate.key()) {
                trace!(tile = %tile, ancestor = %candidate, "found known ancestor");
                return candidate;
            }
        }

        TileCoord::new(0, 0, 0)
    }

    /// Enumerates the tiles covering an extent (in meters) at a zoom
    /// level, expanded by `tile_border` tiles on every side.
    /// [`DEFAULT_TILE_BORDER`] is the usual choice for interactive
    /// panning; pass 0 for an exact cover.
    ///
    /// Candidates are generated row-major with y descending and x
    /// ascending, filtered through [`TileGrid::is_valid_tile`], given their
    /// meter bounds, and sorted nearest-first by Euclidean distance from
    /// the enumerated rectangle's own center. The sort is stable, so
    /// equidistant tiles keep their generation order.
    pub fn tiles_by_extent(&self, extent: &Extent, level: u8, tile_border: u32) -> Vec<TileBounds> {
        let (txmin, tymin) = self.meters_to_tile(extent.xmin, extent.ymin, level);
        let (txmax, tymax) = self.meters_to_tile(extent.xmax, extent.ymax, level);

        let border = tile_border as i64;
        let txmin = txmin - border;
        let tymin = tymin - border;
        let txmax = txmax + border;
        let tymax = tymax + border;

        let mut tiles = Vec::new();
        for ty in (tymin..=tymax).rev() {
            for tx in txmin..=txmax {
                let coord = TileCoord::new(tx, ty, level);
                if self.is_valid_tile(&coord) {
                    tiles.push(TileBounds {
                        coord,
                        bounds: self.tile_meter_bounds(&coord),
                    });
                }
            }
        }

        let center_x = (txmin + txmax) as f64 / 2.0;
        let center_y = (tymin + tymax) as f64 / 2.0;
        tiles.sort_by(|a, b| {
            let da = distance_from(center_x, center_y, &a.coord);
            let db = distance_from(center_x, center_y, &b.coord);
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        });

        debug!(
            level,
            tile_border,
            count = tiles.len(),
            "enumerated tiles for extent"
        );
        tiles
    }

    /// Selects the zoom level able to display an extent (in meters)
    /// inside a viewport of `width` x `height` pixels.
    ///
    /// Degenerate extents (zero width/height, or inverted corners) are
    /// not guarded: they propagate infinity or NaN through the required
    /// resolution, which falls through to the finest configured level.
    pub fn level_by_extent(&self, extent: &Extent, height: f64, width: f64) -> u8 {
        self.pyramid.level_for(required_resolution(extent, height, width))
    }

    /// Selects the zoom level whose resolution is closest to the one an
    /// extent requires in a viewport of `width` x `height` pixels.
    /// First-found wins on ties. Degenerate extents are not guarded.
    pub fn closest_level_by_extent(&self, extent: &Extent, height: f64, width: f64) -> u8 {
        self.pyramid
            .closest_level_for(required_resolution(extent, height, width))
    }

    /// Adjusts an extent so the viewport maps onto an integer number of
    /// same-size tiles at the given zoom level.
    ///
    /// The target spans are `width * resolution(level)` and
    /// `height * resolution(level)`. Without `snap_to_zoom` the target
    /// spans are first rescaled so their aspect ratio matches the input
    /// extent's (the smaller dimension's target is stretched up). The
    /// extent is then padded or shrunk symmetrically about its own
    /// center on each axis.
    pub fn snap_to_zoom_level(
        &self,
        extent: &Extent,
        height: f64,
        width: f64,
        level: u8,
    ) -> Extent {
        let desired_res = self.resolution(level);
        let mut desired_x_delta = width * desired_res;
        let mut desired_y_delta = height * desired_res;

        if !self.config.snap_to_zoom {
            let x_scale = extent.width() / desired_x_delta;
            let y_scale = extent.height() / desired_y_delta;
            if x_scale > y_scale {
                desired_x_delta = extent.width();
                desired_y_delta *= x_scale;
            } else {
                desired_x_delta *= y_scale;
                desired_y_delta = extent.height();
            }
        }

        let x_adjust = (desired_x_delta - extent.width()) / 2.0;
        let y_adjust = (desired_y_delta - extent.height()) / 2.0;
        Extent::new(
            extent.xmin - x_adjust,
            extent.ymin - y_adjust,
            extent.xmax + x_adjust,
            extent.ymax + y_adjust,
        )
    }
}

/// Meters per pixel required to fit an extent into a viewport; the
/// binding axis wins.
#[inline]
fn required_resolution(extent: &Extent, height: f64, width: f64) -> f64 {
    let x_resolution = extent.width() / width;
    let y_resolution = extent.height() / height;
    x_resolution.max(y_resolution)
}

#[inline]
fn distance_from(center_x: f64, center_y: f64, tile: &TileCoord) -> f64 {
    let dx = center_x - tile.x as f64;
    let dy = center_y - tile.y as f64;
    (dx * dx + dy * dy).sqrt()
}
