//! Tile coordinate arithmetic
//!
//! Pure conversions on Web-Mercator tile coordinates: quadkey
//! encoding/decoding, TMS/WMTS row-convention flips, the `"x:y:z"` cache
//! key, longitude wraparound, and parent/child traversal.
//!
//! Everything in this module is stateless integer arithmetic; conversions
//! that depend on a tile source's configuration (resolution pyramid,
//! tile size, origin offsets) live in [`crate::grid`].

mod types;


pub use types::{
    CoordError, Extent, TileBounds, TileCoord, DEFAULT_INITIAL_RESOLUTION, EARTH_RADIUS, MAX_LAT,
    MAX_ZOOM, MIN_LAT, MIN_ZOOM, ORIGIN_SHIFT,
};

/// Encodes a tile coordinate as a quadkey.
///
/// The quadkey is a base-4 string with one digit per zoom level, most
/// significant level first: each digit adds 1 if the corresponding x-bit
/// is set and 2 if the corresponding y-bit is set. The root tile (z = 0)
/// encodes as the empty string.
///
/// Expects a normalized coordinate (`0 <= x, y < 2^z`); only the low
/// `z` bits of each component participate.
pub fn tile_to_quadkey(tile: &TileCoord) -> String {
    let mut quadkey = String::with_capacity(tile.z as usize);
    for i in (1..=tile.z).rev() {
        // Bits beyond an i64 index read as zero
        let mask = if i <= 63 { 1_i64 << (i - 1) } else { 0 };
        let mut digit = 0_u8;
        if tile.x & mask != 0 {
            digit += 1;
        }
        if tile.y & mask != 0 {
            digit += 2;
        }
        quadkey.push(char::from(b'0' + digit));
    }
    quadkey
}

/// Decodes a quadkey back into a tile coordinate.
///
/// The zoom level is the quadkey's length; the empty string decodes to
/// the root tile `(0, 0, 0)`. Exact inverse of [`tile_to_quadkey`] for
/// all valid quadkeys.
///
/// # Errors
///
/// Returns [`CoordError::InvalidQuadkey`] if any character is outside
/// `'0'..='3'`, or if the key is longer than [`MAX_ZOOM`] digits;
/// corrupt input is surfaced rather than silently skipped.
pub fn quadkey_to_tile(quadkey: &str) -> Result<TileCoord, CoordError> {
    let z = quadkey.len();
    if z > MAX_ZOOM as usize {
        return Err(CoordError::InvalidQuadkey(quadkey.to_string()));
    }
    let mut x = 0_i64;
    let mut y = 0_i64;

    for (i, c) in quadkey.chars().enumerate() {
        let mask = 1_i64 << (z - i - 1);
        match c {
            '0' => {}
            '1' => x |= mask,
            '2' => y |= mask,
            '3' => {
                x |= mask;
                y |= mask;
            }
            _ => return Err(CoordError::InvalidQuadkey(quadkey.to_string())),
        }
    }

    Ok(TileCoord::new(x, y, z as u8))
}

/// Number of tiles along one axis at zoom `z`, saturating at `i64::MAX`
/// for depths beyond what an i64 grid index can address. Keeps the
/// wraparound and row-flip arithmetic total for any `u8` zoom instead of
/// overflowing the shift at `z >= 63`.
#[inline]
fn tiles_across(z: u8) -> i64 {
    if z < 63 {
        1_i64 << z
    } else {
        i64::MAX
    }
}

/// Flips a tile row between the TMS (bottom-up) and WMTS (top-down)
/// conventions: `y' = 2^z - 1 - y`.
///
/// The transform is its own inverse; [`wmts_to_tms`] is provided for
/// readability at call sites going the other way.
#[inline]
pub fn tms_to_wmts(tile: &TileCoord) -> TileCoord {
    let top_row = tiles_across(tile.z) - 1;
    TileCoord::new(tile.x, top_row.saturating_sub(tile.y), tile.z)
}

/// Flips a tile row from WMTS (top-down) back to TMS (bottom-up).
///
/// Identical to [`tms_to_wmts`]; the flip is self-inverse.
#[inline]
pub fn wmts_to_tms(tile: &TileCoord) -> TileCoord {
    tms_to_wmts(tile)
}

/// Wraps a tile's x coordinate onto the valid `[0, 2^z)` range.
///
/// With `wrap_around` the x axis is treated as cyclic and any integer x
/// maps back into range via euclidean modulo (correct for negative x);
/// without it the coordinate is returned unchanged.
#[inline]
pub fn normalize(tile: &TileCoord, wrap_around: bool) -> TileCoord {
    if wrap_around {
        let n = tiles_across(tile.z);
        TileCoord::new(tile.x.rem_euclid(n), tile.y, tile.z)
    } else {
        *tile
    }
}

/// Reconstructs an unwrapped world coordinate from a normalized one,
/// given the world index (number of full wraps around the globe).
#[inline]
pub fn denormalize(tile: &TileCoord, world_x: i64) -> TileCoord {
    let offset = world_x.saturating_mul(tiles_across(tile.z));
    TileCoord::new(tile.x.saturating_add(offset), tile.y, tile.z)
}

/// Returns the world index of a (possibly unwrapped) tile coordinate:
/// how many full 360° wraps its x component represents.
#[inline]
pub fn world_x(tile: &TileCoord) -> i64 {
    tile.x.div_euclid(tiles_across(tile.z))
}

/// Returns the parent tile one zoom level coarser.
///
/// Equivalent to stripping the last quadkey digit, computed with bit
/// shifts instead of string slicing. The root tile is its own parent.
#[inline]
pub fn parent(tile: &TileCoord) -> TileCoord {
    if tile.z == 0 {
        return *tile;
    }
    TileCoord::new(tile.x >> 1, tile.y >> 1, tile.z - 1)
}

/// Returns the four child tiles one zoom level finer, in quadkey digit
/// order (`'0'` through `'3'`).
///
/// Equivalent to appending each digit to the tile's quadkey.
#[inline]
pub fn children(tile: &TileCoord) -> [TileCoord; 4] {
    let x = tile.x << 1;
    let y = tile.y << 1;
    let z = tile.z + 1;
    [
        TileCoord::new(x, y, z),
        TileCoord::new(x + 1, y, z),
        TileCoord::new(x, y + 1, z),
        TileCoord::new(x + 1, y + 1, z),
    ]
}
