//! Tile request URL formatting
//!
//! Four interchangeable strategies turn a resolved tile coordinate (or
//! its extent, for the bounding-box variant) into the final request URL
//! by token substitution on the source's normalized template. The
//! coordinate math is shared; only the final substitution step differs,
//! so the strategies are variants of one enum rather than a type
//! hierarchy.

use std::collections::HashMap;

use tracing::trace;

use crate::coord::{self, Extent, TileCoord};
use crate::grid::TileGrid;

/// URL formatting strategy for a tile source.
///
/// # Example
///
/// ```
/// use mercatile::config::TileSourceConfig;
/// use mercatile::grid::TileGrid;
/// use mercatile::url::UrlFormatter;
/// use mercatile::coord::TileCoord;
///
/// let config = TileSourceConfig::new("http://host/{z}/{x}/{y}.png").unwrap();
/// let grid = TileGrid::new(config);
/// let url = UrlFormatter::Xyz.image_url(&grid, TileCoord::new(3, 1, 2));
/// assert_eq!(url, "http://host/2/3/1.png");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlFormatter {
    /// Plain XYZ substitution of `{X}`, `{Y}`, `{Z}`.
    Xyz,

    /// Quadkey substitution of `{Q}`: the coordinate is flipped to the
    /// WMTS row convention, encoded as a quadkey, and substituted.
    QuadKey,

    /// TMS substitution of `{X}`, `{Y}`, `{Z}`.
    ///
    /// Identical substitution to [`UrlFormatter::Xyz`]; callers working
    /// in the WMTS convention flip the row with
    /// [`coord::wmts_to_tms`] before formatting.
    Tms,

    /// Bounding-box substitution of `{XMIN}`, `{YMIN}`, `{XMAX}`,
    /// `{YMAX}` with the tile's extent, in geographic degrees when
    /// `use_latlon` is set and Web-Mercator meters otherwise.
    BBox {
        /// Substitute geographic bounds instead of meter bounds
        use_latlon: bool,
    },
}

impl UrlFormatter {
    /// Builds the request URL for a resolved tile coordinate.
    ///
    /// Caller-supplied `extra_url_vars` from the source configuration
    /// are substituted first, then the strategy's coordinate tokens.
    /// Every occurrence of a placeholder is replaced.
    pub fn image_url(&self, grid: &TileGrid, tile: TileCoord) -> String {
        let config = grid.config();
        let template = substitute_vars(&config.url, &config.extra_url_vars);

        let url = match self {
            UrlFormatter::Xyz | UrlFormatter::Tms => template
                .replace("{X}", &tile.x.to_string())
                .replace("{Y}", &tile.y.to_string())
                .replace("{Z}", &tile.z.to_string()),
            UrlFormatter::QuadKey => {
                let wmts = coord::tms_to_wmts(&tile);
                template.replace("{Q}", &coord::tile_to_quadkey(&wmts))
            }
            UrlFormatter::BBox { use_latlon } => {
                let bounds = if *use_latlon {
                    grid.tile_geographic_bounds(&tile)
                } else {
                    grid.tile_meter_bounds(&tile)
                };
                substitute_bounds(&template, &bounds)
            }
        };

        trace!(tile = %tile, url = %url, "formatted tile request url");
        url
    }
}

/// Substitutes a caller-supplied key/value map into a template: each key
/// `k` replaces every occurrence of `{k}`.
fn substitute_vars(template: &str, vars: &HashMap<String, String>) -> String {
    let mut url = template.to_string();
    for (key, value) in vars {
        url = url.replace(&format!("{{{}}}", key), value);
    }
    url
}

fn substitute_bounds(template: &str, bounds: &Extent) -> String {
    template
        .replace("{XMIN}", &bounds.xmin.to_string())
        .replace("{YMIN}", &bounds.ymin.to_string())
        .replace("{XMAX}", &bounds.xmax.to_string())
        .replace("{YMAX}", &bounds.ymax.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TileSourceConfig;
    use crate::coord::quadkey_to_tile;

    fn grid_for(template: &str) -> TileGrid {
        TileGrid::new(TileSourceConfig::new(template).unwrap())
    }

    #[test]
    fn test_xyz_substitution() {
        let grid = grid_for("http://host/{z}/{x}/{y}.png");
        let url = UrlFormatter::Xyz.image_url(&grid, TileCoord::new(19295, 24640, 16));
        assert_eq!(url, "http://host/16/19295/24640.png");
    }

    #[test]
    fn test_tms_substitution_matches_xyz() {
        let grid = grid_for("http://host/{z}/{x}/{y}.png");
        let tile = TileCoord::new(3, 1, 2);
        assert_eq!(
            UrlFormatter::Tms.image_url(&grid, tile),
            UrlFormatter::Xyz.image_url(&grid, tile),
            "the TMS formatter differs only in what the caller flips upstream"
        );
    }

    #[test]
    fn test_repeated_tokens_all_substituted() {
        let grid = grid_for("http://host/{z}/{x}/{y}.png?copy={x}");
        let url = UrlFormatter::Xyz.image_url(&grid, TileCoord::new(3, 1, 2));
        assert_eq!(url, "http://host/2/3/1.png?copy=3");
    }

    #[test]
    fn test_quadkey_substitution_round_trips() {
        let grid = grid_for("http://host/{q}.png");
        let tile = TileCoord::new(3, 1, 2);
        let url = UrlFormatter::QuadKey.image_url(&grid, tile);

        let quadkey = url
            .strip_prefix("http://host/")
            .and_then(|rest| rest.strip_suffix(".png"))
            .expect("quadkey segment");
        assert_eq!(quadkey.len(), 2, "quadkey length equals zoom");

        // Decoding the substituted quadkey recovers the WMTS-flipped tile
        let decoded = quadkey_to_tile(quadkey).unwrap();
        assert_eq!(decoded, coord::tms_to_wmts(&tile));
        assert_eq!(quadkey, "31");
    }

    #[test]
    fn test_bbox_meter_substitution() {
        let grid = grid_for("http://host/wms?bbox={xmin},{ymin},{xmax},{ymax}");
        let tile = TileCoord::new(0, 0, 0);
        let url = UrlFormatter::BBox { use_latlon: false }.image_url(&grid, tile);

        let bounds = grid.tile_meter_bounds(&tile);
        let expected = format!(
            "http://host/wms?bbox={},{},{},{}",
            bounds.xmin, bounds.ymin, bounds.xmax, bounds.ymax
        );
        assert_eq!(url, expected);
    }

    #[test]
    fn test_bbox_geographic_substitution() {
        let grid = grid_for("http://host/wms?bbox={xmin},{ymin},{xmax},{ymax}");
        let tile = TileCoord::new(0, 0, 0);
        let url = UrlFormatter::BBox { use_latlon: true }.image_url(&grid, tile);

        assert!(
            url.contains("-180") && url.contains("180"),
            "geographic bounds of the root tile span the full longitude range: {}",
            url
        );
    }

    #[test]
    fn test_extra_url_vars_substituted() {
        let config = TileSourceConfig::new("http://host/{z}/{x}/{y}.png?key={apikey}&style={style}")
            .unwrap()
            .with_url_var("apikey", "abc123")
            .with_url_var("style", "satellite");
        let grid = TileGrid::new(config);

        let url = UrlFormatter::Xyz.image_url(&grid, TileCoord::new(1, 2, 3));
        assert_eq!(url, "http://host/3/1/2.png?key=abc123&style=satellite");
    }
}
