// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DMat3, DMat4, DVec2, DVec3};

/// Tolerance used to reject segments running parallel to a plane.
const PARALLEL_TOLERANCE: f64 = 1e-6;

/// Points closer than this are treated as the same hit.
const COINCIDENT_TOLERANCE: f64 = 1e-9;

/// Intersects the segment `p1`..`p2` with the plane through `origin` with `normal`.
///
/// Returns the parametric position `t` along the segment and the hit point when
/// the crossing lies within the segment (`0 <= t <= 1`). Segments parallel to
/// the plane never intersect.
#[must_use]
pub fn intersect_plane_with_segment(
    normal: DVec3,
    origin: DVec3,
    p1: DVec3,
    p2: DVec3,
) -> Option<(f64, DVec3)> {
    let direction = p2 - p1;
    let denominator = normal.dot(direction);
    if denominator.abs() <= PARALLEL_TOLERANCE * normal.length() * direction.length() {
        return None;
    }
    let t = normal.dot(origin - p1) / denominator;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some((t, p1 + direction * t))
}

/// Intersects a finite rectangle with an infinite plane.
///
/// The rectangle is given by `rect_origin` and the two corners adjacent to it,
/// `rect_x_corner` and `rect_y_corner`. Its four edges are walked in perimeter
/// order and the first two distinct crossings are returned.
///
/// Returns `None` when the rectangle does not cross the plane or only touches
/// it at a single point.
#[must_use]
pub fn intersect_finite_plane(
    normal: DVec3,
    point_on_plane: DVec3,
    rect_origin: DVec3,
    rect_x_corner: DVec3,
    rect_y_corner: DVec3,
) -> Option<(DVec3, DVec3)> {
    let rect_far_corner = rect_x_corner + rect_y_corner - rect_origin;
    let edges = [
        (rect_origin, rect_x_corner),
        (rect_x_corner, rect_far_corner),
        (rect_far_corner, rect_y_corner),
        (rect_y_corner, rect_origin),
    ];

    let mut first: Option<DVec3> = None;
    for (a, b) in edges {
        let Some((_, hit)) = intersect_plane_with_segment(normal, point_on_plane, a, b) else {
            continue;
        };
        match first {
            None => first = Some(hit),
            Some(p) if p.distance(hit) > COINCIDENT_TOLERANCE => return Some((p, hit)),
            Some(_) => {}
        }
    }
    None
}

/// Computes where another view plane crosses the current view.
///
/// `other_dimensions` is the other plane's size in pixels and
/// `other_xy_to_current_xy` maps its pixel space into the current view's
/// pixel space. The footprint `(0,0)`, `(W,0)`, `(0,H)` is mapped across and
/// intersected with the current view plane `z = 0`.
///
/// The returned tips are in the current view's pixel space.
#[must_use]
pub fn line_tips_from_plane(
    other_dimensions: (u32, u32),
    other_xy_to_current_xy: DMat4,
) -> Option<(DVec3, DVec3)> {
    let (width, height) = other_dimensions;
    let origin = other_xy_to_current_xy.transform_point3(DVec3::ZERO);
    let x_corner = other_xy_to_current_xy.transform_point3(DVec3::new(f64::from(width), 0.0, 0.0));
    let y_corner =
        other_xy_to_current_xy.transform_point3(DVec3::new(0.0, f64::from(height), 0.0));
    intersect_finite_plane(DVec3::Z, DVec3::ZERO, origin, x_corner, y_corner)
}

/// Computes the in-view offset of a slab boundary from its centre line.
///
/// A slab of thickness `2 * half_thickness` (world units) is centred on a plane
/// with unit normal `other_normal_world`. Seen in the current view, each slab
/// boundary is the intersection line shifted sideways. The returned 2D vector
/// is that shift in the current view's pixel space; it is perpendicular to
/// the intersection line.
///
/// Returns `None` when the planes are parallel, so no line exists to offset.
#[must_use]
pub fn slab_offset_in_plane(
    current_xy_to_world: DMat4,
    other_normal_world: DVec3,
    half_thickness: f64,
) -> Option<DVec2> {
    // Gradient of the other plane's signed distance, expressed in current pixel space.
    let linear = DMat3::from_mat4(current_xy_to_world);
    let gradient = linear.transpose() * other_normal_world;
    let in_plane = gradient.truncate();
    let length_squared = in_plane.length_squared();
    if length_squared <= f64::EPSILON {
        log::debug!("slab offset skipped: planes are parallel");
        return None;
    }
    Some(in_plane * (half_thickness / length_squared))
}
