//! Spherical Web-Mercator projection
//!
//! Forward and inverse transforms between geographic coordinates
//! (longitude/latitude in degrees) and Web-Mercator meters (EPSG:3857).
//! The WGS84 ellipsoid is flattened to a sphere of radius
//! [`EARTH_RADIUS`](crate::coord::EARTH_RADIUS) for Mercator purposes.
//!
//! Inputs must be finite. Output is finite for any latitude strictly
//! within (-90°, 90°); behavior at the poles is undefined (Mercator's
//! inherent singularity) and callers must not rely on pole values.

use std::f64::consts::PI;

use crate::coord::{Extent, ORIGIN_SHIFT};

/// Converts geographic coordinates to Web-Mercator meters.
///
/// # Arguments
///
/// * `lon` - Longitude in degrees
/// * `lat` - Latitude in degrees, strictly within (-90, 90)
///
/// # Returns
///
/// The `(mx, my)` position in meters from the projection origin.
#[inline]
pub fn geographic_to_meters(lon: f64, lat: f64) -> (f64, f64) {
    let mx = lon * ORIGIN_SHIFT / 180.0;
    let my = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0) * ORIGIN_SHIFT / 180.0;
    (mx, my)
}

/// Converts Web-Mercator meters back to geographic coordinates.
///
/// Exact algebraic inverse of [`geographic_to_meters`].
#[inline]
pub fn meters_to_geographic(mx: f64, my: f64) -> (f64, f64) {
    let lon = mx / ORIGIN_SHIFT * 180.0;
    let lat_deg = my / ORIGIN_SHIFT * 180.0;
    let lat = 180.0 / PI * (2.0 * (lat_deg * PI / 180.0).exp().atan() - PI / 2.0);
    (lon, lat)
}

/// Projects a geographic extent's corners to meters.
///
/// Only the min/max corners are transformed (not a general polygon
/// reprojection), which is sufficient because extents in this system are
/// always axis-aligned boxes.
pub fn geographic_extent_to_meters(extent: &Extent) -> Extent {
    let (xmin, ymin) = geographic_to_meters(extent.xmin, extent.ymin);
    let (xmax, ymax) = geographic_to_meters(extent.xmax, extent.ymax);
    Extent::new(xmin, ymin, xmax, ymax)
}

/// Projects a meter extent's corners back to geographic degrees.
pub fn meters_extent_to_geographic(extent: &Extent) -> Extent {
    let (xmin, ymin) = meters_to_geographic(extent.xmin, extent.ymin);
    let (xmax, ymax) = meters_to_geographic(extent.xmax, extent.ymax);
    Extent::new(xmin, ymin, xmax, ymax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::MAX_LAT;

    #[test]
    fn test_origin_maps_to_origin() {
        let (mx, my) = geographic_to_meters(0.0, 0.0);
        assert!(mx.abs() < 1e-9);
        assert!(my.abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_maps_to_origin_shift() {
        let (mx, _) = geographic_to_meters(180.0, 0.0);
        assert!((mx - ORIGIN_SHIFT).abs() < 1e-6);

        let (mx, _) = geographic_to_meters(-180.0, 0.0);
        assert!((mx + ORIGIN_SHIFT).abs() < 1e-6);
    }

    #[test]
    fn test_mercator_latitude_limit_is_square() {
        // The Web-Mercator world is square: the latitude cutoff projects
        // to the same magnitude as the antimeridian
        let (_, my) = geographic_to_meters(0.0, MAX_LAT);
        assert!(
            (my - ORIGIN_SHIFT).abs() < 1.0,
            "lat {} should project to ~{} (got {})",
            MAX_LAT,
            ORIGIN_SHIFT,
            my
        );
    }

    #[test]
    fn test_round_trip_cities() {
        let cities = [
            (-74.0060, 40.7128),  // New York
            (-0.1278, 51.5074),   // London
            (151.2093, -33.8688), // Sydney
            (18.4241, -33.9249),  // Cape Town
        ];
        for (lon, lat) in cities {
            let (mx, my) = geographic_to_meters(lon, lat);
            let (lon2, lat2) = meters_to_geographic(mx, my);
            assert!(
                (lon - lon2).abs() < 1e-9,
                "longitude round trip drifted for ({}, {})",
                lon,
                lat
            );
            assert!(
                (lat - lat2).abs() < 1e-9,
                "latitude round trip drifted for ({}, {})",
                lon,
                lat
            );
        }
    }

    #[test]
    fn test_extent_round_trip() {
        let geo = Extent::new(-10.0, -20.0, 30.0, 45.0);
        let meters = geographic_extent_to_meters(&geo);
        let back = meters_extent_to_geographic(&meters);

        assert!((back.xmin - geo.xmin).abs() < 1e-9);
        assert!((back.ymin - geo.ymin).abs() < 1e-9);
        assert!((back.xmax - geo.xmax).abs() < 1e-9);
        assert!((back.ymax - geo.ymax).abs() < 1e-9);
    }
}
