// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::DVec3;

/// Computes the closest-approach parameters of two segments.
///
/// Solves for `u` and `v` such that `a1 + u * (a2 - a1)` and
/// `b1 + v * (b2 - b1)` are the closest points of the two supporting lines.
/// Returns `Some((u, v))` only when both parameters fall within `[0, 1]`.
/// Parallel (or degenerate) segments return `None`.
#[must_use]
pub fn segment_intersection(a1: DVec3, a2: DVec3, b1: DVec3, b2: DVec3) -> Option<(f64, f64)> {
    let u21 = a2 - a1;
    let v21 = b2 - b1;
    let w = a1 - b1;

    let a00 = u21.dot(u21);
    let a01 = -u21.dot(v21);
    let a11 = v21.dot(v21);
    let c0 = -u21.dot(w);
    let c1 = v21.dot(w);

    let determinant = a00 * a11 - a01 * a01;
    if determinant.abs() <= 1e-12 * a00 * a11 {
        return None;
    }
    let u = (c0 * a11 - a01 * c1) / determinant;
    let v = (a00 * c1 - a01 * c0) / determinant;

    if (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) {
        Some((u, v))
    } else {
        None
    }
}

/// Extends the segment `r`..`l` far past both ends.
///
/// Returns `(extended_r, extended_l)` where each new end lies `factor` segment
/// lengths beyond the opposite original end. A long extension lets nearly
/// parallel but visually short lines still report the crossing of their
/// supporting lines.
#[must_use]
pub fn extended_segment(r: DVec3, l: DVec3, factor: f64) -> (DVec3, DVec3) {
    let direction = r - l;
    (l + direction * factor, r - direction * factor)
}
