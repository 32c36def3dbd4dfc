// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Tunable constants of the slice-intersection display and its hit testing.
///
/// Lengths are in pixels of the current view unless noted otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionConfig {
    /// Squared pixel distance beyond the picking radius over which handle
    /// opacity fades from one to zero.
    pub opacity_range: f64,
    /// Fraction of the view extent kept clear of handles along each border.
    pub handles_margin: f64,
    /// Gap left around the crossing point, as a fraction of the view width.
    pub gap_fraction: f64,
    /// Handle size.
    pub interaction_size: f64,
    /// Half-lines not longer than this carry no rotation or slice-offset handle.
    pub handles_min_line_length: f64,
    /// Half-lines not longer than this carry no thick-slab handle.
    pub thick_slab_handles_min_line_length: f64,
    /// Number of segments each half-line is sampled with for hit testing.
    pub line_resolution: u32,
    /// Factor by which lines are extended before intersecting them pairwise.
    pub extension_factor: f64,
    /// Pointer picking tolerance.
    pub picking_tolerance: f64,
    /// Ratio of physical to logical pixels.
    pub screen_scale_factor: f64,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            opacity_range: 1000.0,
            handles_margin: 0.03,
            gap_fraction: 0.05,
            interaction_size: 20.0,
            handles_min_line_length: 50.0,
            thick_slab_handles_min_line_length: 50.0,
            line_resolution: 50,
            extension_factor: 100.0,
            picking_tolerance: reslice_view::DEFAULT_PICKING_TOLERANCE,
            screen_scale_factor: 1.0,
        }
    }
}
