//! Resolution pyramid for a zoom range.

/// Ordered meters-per-pixel values, one per zoom level from `min_zoom`
/// to `max_zoom`, strictly decreasing as zoom increases.
///
/// Computed once per tile source configuration and treated as read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct ResolutionPyramid {
    resolutions: Vec<f64>,
    min_zoom: u8,
}

impl ResolutionPyramid {
    /// Builds the pyramid by halving `initial_resolution` (meters per
    /// pixel at zoom 0) once per level.
    ///
    /// Expects `min_zoom <= max_zoom`; the zoom range is validated when
    /// the tile source configuration is constructed.
    pub fn new(initial_resolution: f64, min_zoom: u8, max_zoom: u8) -> Self {
        let resolutions = (min_zoom..=max_zoom)
            .map(|level| initial_resolution / 2_f64.powi(level as i32))
            .collect();
        Self {
            resolutions,
            min_zoom,
        }
    }

    /// The meters-per-pixel values in pyramid order (coarse to fine).
    pub fn resolutions(&self) -> &[f64] {
        &self.resolutions
    }

    /// Selects a zoom level able to display the given required
    /// resolution (meters per pixel).
    ///
    /// Scans coarse to fine; the first pyramid entry the requirement
    /// exceeds yields one level coarser than that entry, clamped at the
    /// start of the range. If the requirement exceeds no entry (it is
    /// finer than anything configured) the finest available level is
    /// returned.
    ///
    /// A NaN requirement (degenerate extent upstream) exceeds nothing
    /// and falls through to the finest level.
    pub fn level_for(&self, required: f64) -> u8 {
        for (i, r) in self.resolutions.iter().enumerate() {
            if required > *r {
                let index = i.saturating_sub(1);
                return self.min_zoom + index as u8;
            }
        }
        self.min_zoom + (self.resolutions.len() - 1) as u8
    }

    /// Selects the zoom level whose resolution is closest in absolute
    /// difference to the required resolution. First-found wins on ties.
    pub fn closest_level_for(&self, required: f64) -> u8 {
        let mut closest_index = 0;
        let mut closest_diff = f64::INFINITY;
        for (i, r) in self.resolutions.iter().enumerate() {
            let diff = (r - required).abs();
            if diff < closest_diff {
                closest_diff = diff;
                closest_index = i;
            }
        }
        self.min_zoom + closest_index as u8
    }
}
