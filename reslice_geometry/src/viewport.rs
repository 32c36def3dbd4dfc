// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DMat4, DVec3};
use kurbo::{Point, Rect};

/// Slopes flatter than this on the x axis are treated as vertical lines.
const VERTICAL_TOLERANCE: f64 = 1e-12;

/// Slack allowed when testing whether a crossing lies on a segment or edge.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Finds where the segment `a`..`b` crosses the border of `bounds`.
///
/// The supporting line of the segment is intersected with the left, right,
/// bottom and top edges in turn (`x0`, `x1`, `y0`, `y1` of `bounds`). The
/// first crossing that lies both on the edge and on the segment is returned.
/// Vertical segments are handled without computing a slope.
///
/// Returns `None` when the segment does not reach the border.
#[must_use]
pub fn segment_viewport_intersection(a: Point, b: Point, bounds: Rect) -> Option<Point> {
    let (seg_x_min, seg_x_max) = (a.x.min(b.x), a.x.max(b.x));
    let (seg_y_min, seg_y_max) = (a.y.min(b.y), a.y.max(b.y));
    let within = |value: f64, min: f64, max: f64| {
        value >= min - EDGE_TOLERANCE && value <= max + EDGE_TOLERANCE
    };
    let on_horizontal_edge =
        |x: f64| within(x, bounds.x0, bounds.x1) && within(x, seg_x_min, seg_x_max);
    let on_vertical_edge =
        |y: f64| within(y, bounds.y0, bounds.y1) && within(y, seg_y_min, seg_y_max);

    if (b.x - a.x).abs() <= VERTICAL_TOLERANCE {
        let x = a.x;
        if !within(x, bounds.x0, bounds.x1) {
            return None;
        }
        return [bounds.y0, bounds.y1]
            .into_iter()
            .find(|&y| within(y, seg_y_min, seg_y_max))
            .map(|y| Point::new(x, y));
    }

    let slope = (b.y - a.y) / (b.x - a.x);
    let intercept = a.y - slope * a.x;

    for x in [bounds.x0, bounds.x1] {
        let y = slope * x + intercept;
        if within(x, seg_x_min, seg_x_max) && on_vertical_edge(y) {
            return Some(Point::new(x, y));
        }
    }
    if slope != 0.0 {
        for y in [bounds.y0, bounds.y1] {
            let x = (y - intercept) / slope;
            if within(y, seg_y_min, seg_y_max) && on_horizontal_edge(x) {
                return Some(Point::new(x, y));
            }
        }
    }
    None
}

/// Computes the visible footprint of a view in its own pixel space.
///
/// The field of view (in world units, centred on the slice origin) has its
/// corners mapped to world space through `slice_to_world` and back into
/// pixels through `world_to_xy`. The axis-aligned bounds of those corners are
/// returned.
#[must_use]
pub fn viewport_bounds(slice_to_world: DMat4, world_to_xy: DMat4, field_of_view: DVec3) -> Rect {
    let half_x = field_of_view.x / 2.0;
    let half_y = field_of_view.y / 2.0;
    let corners = [
        DVec3::new(-half_x, -half_y, 0.0),
        DVec3::new(half_x, -half_y, 0.0),
        DVec3::new(-half_x, half_y, 0.0),
        DVec3::new(half_x, half_y, 0.0),
    ];
    let slice_to_xy = world_to_xy * slice_to_world;

    let mut bounds: Option<Rect> = None;
    for corner in corners {
        let p = slice_to_xy.transform_point3(corner);
        let p = Point::new(p.x, p.y);
        bounds = Some(match bounds {
            None => Rect::from_points(p, p),
            Some(r) => r.union_pt(p),
        });
    }
    bounds.unwrap_or(Rect::ZERO)
}

/// Shrinks `bounds` on every side by `fraction` of its extent along that axis.
#[must_use]
pub fn shrink_bounds(bounds: Rect, fraction: f64) -> Rect {
    let dx = bounds.width() * fraction;
    let dy = bounds.height() * fraction;
    Rect::new(bounds.x0 + dx, bounds.y0 + dy, bounds.x1 - dx, bounds.y1 - dy)
}

/// Returns `true` when `point` lies strictly inside `bounds`.
#[must_use]
pub fn contains_strictly(bounds: Rect, point: Point) -> bool {
    point.x > bounds.x0 && point.x < bounds.x1 && point.y > bounds.y0 && point.y < bounds.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

    fn assert_point_eq(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn crossing_left_edge() {
        let p = segment_viewport_intersection(Point::new(-1.0, 0.5), Point::new(0.5, 0.5), UNIT)
            .unwrap();
        assert_point_eq(p, Point::new(0.0, 0.5));
    }

    #[test]
    fn crossing_top_edge_diagonally() {
        let p = segment_viewport_intersection(Point::new(0.5, 2.0), Point::new(0.25, 0.5), UNIT)
            .unwrap();
        // Supporting line y = 6x - 1 meets the left edge below the segment.
        assert_point_eq(p, Point::new(1.0 / 3.0, 1.0));
    }

    #[test]
    fn vertical_line_keeps_its_x() {
        let p = segment_viewport_intersection(Point::new(0.3, -1.0), Point::new(0.3, 0.5), UNIT)
            .unwrap();
        assert_point_eq(p, Point::new(0.3, 0.0));
    }

    #[test]
    fn segment_inside_viewport_has_no_crossing() {
        assert!(
            segment_viewport_intersection(Point::new(0.2, 0.2), Point::new(0.8, 0.7), UNIT)
                .is_none()
        );
    }

    #[test]
    fn identity_pose_bounds_cover_field_of_view() {
        // 200 x 100 pixel view with 1 mm pixels, origin in the view centre.
        let slice_to_world = DMat4::IDENTITY;
        let world_to_xy = DMat4::from_translation(DVec3::new(100.0, 50.0, 0.0));
        let b = viewport_bounds(slice_to_world, world_to_xy, DVec3::new(200.0, 100.0, 1.0));
        assert_eq!(b, Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn shrink_and_strict_containment() {
        let r = shrink_bounds(Rect::new(0.0, 0.0, 100.0, 200.0), 0.03);
        let expected = Rect::new(3.0, 6.0, 97.0, 194.0);
        assert!((r.x0 - expected.x0).abs() < 1e-12 && (r.y0 - expected.y0).abs() < 1e-12);
        assert!((r.x1 - expected.x1).abs() < 1e-12 && (r.y1 - expected.y1).abs() < 1e-12);
        assert!(contains_strictly(r, Point::new(50.0, 50.0)));
        assert!(!contains_strictly(r, Point::new(3.0, 50.0)));
    }
}
