// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local geometry of the handle glyphs.
//!
//! Glyphs are authored around [`DEFAULT_HANDLE_POSITION`] pointing along
//! [`DEFAULT_HANDLE_ORIENTATION`] (`+Y`), in pixels. Only the points used for
//! hit testing are produced here; hosts draw the glyph shapes themselves from
//! the same constants.

use glam::DVec3;
use reslice_geometry::{DEFAULT_HANDLE_ORIENTATION, DEFAULT_HANDLE_POSITION};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Length of the rotation arc and slice-offset arrow glyphs.
pub const HANDLE_ARROW_LENGTH: f64 = 60.0;

/// Shaft radius of the rotation and slice-offset glyphs.
pub const HANDLE_ARROW_RADIUS: f64 = 3.0;

/// Opening angle of the arrow tip cones, in degrees.
pub const HANDLE_ARROW_TIP_ANGLE: f64 = 27.0;

/// Outer radius of the translation disc.
pub const TRANSLATION_HANDLE_OUTER_RADIUS: f64 = 9.0;

/// Inner radius of the translation disc.
pub const TRANSLATION_HANDLE_INNER_RADIUS: f64 = 7.0;

/// Number of hit-test points of the rotation and slice-offset glyphs.
pub const HANDLE_POINT_COUNT: usize = 7;

/// Radius of the arrow tip cones.
#[must_use]
pub fn cone_radius() -> f64 {
    2.0 * HANDLE_ARROW_RADIUS
}

/// Length of the arrow tip cones.
#[must_use]
pub fn cone_length() -> f64 {
    cone_radius() / HANDLE_ARROW_TIP_ANGLE.to_radians().tan()
}

/// Hit-test points of the rotation handle: a circular arc bowed away from
/// the glyph origin with a cone at each end.
///
/// Returned in order: origin, right arc tip, right arc midpoint, right cone
/// centre, left arc tip, left arc midpoint, left cone centre.
#[must_use]
pub fn rotation_handle_points() -> [DVec3; HANDLE_POINT_COUNT] {
    let up = DEFAULT_HANDLE_ORIENTATION;
    let side = DVec3::new(up.y, -up.x, up.z);
    let cone_length = cone_length();

    let tip_r = up * (HANDLE_ARROW_LENGTH / 2.0);
    let tip_l = -up * (HANDLE_ARROW_LENGTH / 2.0);
    let center = side * (-HANDLE_ARROW_LENGTH / 3.0);

    // Shift the arc so that its chord passes through the origin side of the
    // circle, keeping the shorter of the two sagittas.
    let radius = tip_r.distance(center);
    let half_chord = tip_r.distance(tip_l) / 2.0;
    let rise = (radius * radius - half_chord * half_chord).max(0.0).sqrt();
    let sagitta = side * (radius - rise).min(radius + rise);
    let tip_r = tip_r - sagitta;
    let tip_l = tip_l - sagitta;
    let center = center - sagitta;

    let radial_r = tip_r - center;
    let radial_l = tip_l - center;
    let tangent_r = DVec3::new(-radial_r.y, radial_r.x, 0.0).normalize_or_zero();
    let tangent_l = DVec3::new(radial_l.y, -radial_l.x, 0.0).normalize_or_zero();

    [
        DEFAULT_HANDLE_POSITION,
        tip_r,
        tip_r / 2.0,
        tip_r + tangent_r * (cone_length / 2.0),
        tip_l,
        tip_l / 2.0,
        tip_l + tangent_l * (cone_length / 2.0),
    ]
}

/// Hit-test points of the slice-offset handle: a straight double arrow.
///
/// Returned in order: origin, then tip, centre and base of the forward cone,
/// then tip, centre and base of the backward cone.
#[must_use]
pub fn slice_offset_handle_points() -> [DVec3; HANDLE_POINT_COUNT] {
    let up = DEFAULT_HANDLE_ORIENTATION;
    let cone_length = cone_length();
    let shaft_length = HANDLE_ARROW_LENGTH - 2.0 * cone_length;
    let base = shaft_length / 2.0;

    [
        DEFAULT_HANDLE_POSITION,
        up * (base + cone_length),
        up * (base + cone_length / 2.0),
        up * base,
        -up * (base + cone_length),
        -up * (base + cone_length / 2.0),
        -up * base,
    ]
}
