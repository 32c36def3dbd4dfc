// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DMat3, DMat4, DVec2, DVec3};

/// Position at which handle glyphs are authored.
pub const DEFAULT_HANDLE_POSITION: DVec3 = DVec3::ZERO;

/// Direction in which handle glyphs are authored.
pub const DEFAULT_HANDLE_ORIENTATION: DVec3 = DVec3::Y;

/// Cross products shorter than this are treated as zero.
const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Builds the rotation taking the direction of `v1` onto the direction of `v2`.
///
/// - Parallel vectors give the identity.
/// - Antiparallel vectors give a half turn. For vectors in the `z = 0` plane
///   the half turn is about `+Z`; otherwise it is about an arbitrary axis
///   perpendicular to `v1`.
/// - Otherwise Rodrigues' formula `I + K + K²·(1 − cos θ)/sin² θ` is used, with
///   `K` the skew-symmetric matrix of `v1 × v2`.
///
/// A zero-length input has no direction; the identity is returned.
#[must_use]
pub fn rotation_matrix_between_vectors(v1: DVec3, v2: DVec3) -> DMat4 {
    let (Some(a), Some(b)) = (v1.try_normalize(), v2.try_normalize()) else {
        log::debug!("rotation between {v1} and {v2}: zero-length input, using identity");
        return DMat4::IDENTITY;
    };

    let axis = a.cross(b);
    let sin = axis.length();
    let cos = a.dot(b);

    if sin <= PARALLEL_TOLERANCE {
        if cos > 0.0 {
            return DMat4::IDENTITY;
        }
        let half_turn_axis = if a.z.abs() <= PARALLEL_TOLERANCE {
            DVec3::Z
        } else {
            a.any_orthonormal_vector()
        };
        let outer = DMat3::from_cols(
            half_turn_axis * half_turn_axis.x,
            half_turn_axis * half_turn_axis.y,
            half_turn_axis * half_turn_axis.z,
        );
        return DMat4::from_mat3(outer * 2.0 - DMat3::IDENTITY);
    }

    let k = DMat3::from_cols(
        DVec3::new(0.0, axis.z, -axis.y),
        DVec3::new(-axis.z, 0.0, axis.x),
        DVec3::new(axis.y, -axis.x, 0.0),
    );
    let rotation = DMat3::IDENTITY + k + (k * k) * ((1.0 - cos) / (sin * sin));
    DMat4::from_mat3(rotation)
}

/// Builds the placement transform of a handle glyph.
///
/// Glyphs are authored at [`DEFAULT_HANDLE_POSITION`] pointing along
/// [`DEFAULT_HANDLE_ORIENTATION`]. The result first rotates that direction
/// onto `orientation` and then moves the glyph to `position`, both given in
/// the view's 2D pixel space.
#[must_use]
pub fn handle_to_world_transform(position: DVec2, orientation: DVec2) -> DMat4 {
    let rotation =
        rotation_matrix_between_vectors(DEFAULT_HANDLE_ORIENTATION, orientation.extend(0.0));
    let translation = position.extend(0.0) - DEFAULT_HANDLE_POSITION;
    DMat4::from_translation(translation) * rotation
}

/// Builds a rotation by `angle` radians about the line through `center` along `axis`.
///
/// A zero-length axis gives the identity.
#[must_use]
pub fn rotation_about_axis(center: DVec3, axis: DVec3, angle: f64) -> DMat4 {
    let Some(axis) = axis.try_normalize() else {
        log::debug!("rotation about zero-length axis, using identity");
        return DMat4::IDENTITY;
    };
    DMat4::from_translation(center)
        * DMat4::from_axis_angle(axis, angle)
        * DMat4::from_translation(-center)
}
