// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::DVec2;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Mouse cursor a widget asks the host to show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorShape {
    /// Platform default arrow.
    #[default]
    Default,
    /// Four-way move.
    SizeAll,
    /// Grabbing hand.
    Hand,
    /// Vertical resize.
    SizeNS,
    /// Horizontal resize.
    SizeWE,
    /// Diagonal resize, bottom-left to top-right.
    SizeNE,
    /// Diagonal resize, top-left to bottom-right.
    SizeNW,
}

impl CursorShape {
    /// Picks the resize cursor closest to `direction`.
    ///
    /// The direction is folded onto a half circle and quantized into 45°
    /// sectors centred on the horizontal, the two diagonals and the vertical.
    /// A zero direction gives [`CursorShape::Default`].
    #[must_use]
    pub fn for_direction(direction: DVec2) -> Self {
        if direction == DVec2::ZERO || !direction.is_finite() {
            return Self::Default;
        }
        let mut degrees = direction.y.atan2(direction.x).to_degrees();
        if degrees < 0.0 {
            degrees += 180.0;
        }
        match degrees {
            d if !(22.5..157.5).contains(&d) => Self::SizeWE,
            d if d < 67.5 => Self::SizeNE,
            d if d < 112.5 => Self::SizeNS,
            _ => Self::SizeNW,
        }
    }
}
