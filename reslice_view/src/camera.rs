// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DMat4, DVec3};
use kurbo::{Point, Rect, Size};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Projected distances below this many pixels are too small to derive a scale from.
const MIN_SCALE_PIXELS: f64 = 1e-3;

/// A look-at camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position in world coordinates.
    pub position: DVec3,
    /// Point the camera looks at.
    pub focal_point: DVec3,
    /// Up direction; does not need to be orthogonal to the view direction.
    pub view_up: DVec3,
    /// Vertical view angle in degrees, used for perspective projection.
    pub view_angle: f64,
    /// Use an orthographic projection instead of a perspective one.
    pub parallel_projection: bool,
    /// Half the height of the viewport in world units, used for parallel projection.
    pub parallel_scale: f64,
    /// Near and far clipping distances from the eye.
    pub clipping_range: (f64, f64),
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 1.0),
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
            view_angle: 30.0,
            parallel_projection: false,
            parallel_scale: 1.0,
            clipping_range: (0.01, 1000.01),
        }
    }
}

impl Camera {
    /// Unit vector from the eye towards the focal point.
    #[must_use]
    pub fn direction_of_projection(&self) -> DVec3 {
        (self.focal_point - self.position).normalize_or_zero()
    }

    /// World to eye coordinates.
    #[must_use]
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.focal_point, self.view_up)
    }

    /// Eye to clip coordinates for a viewport of the given aspect ratio.
    ///
    /// Depth is mapped to `[0, 1]` between the clipping planes.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f64) -> DMat4 {
        let (near, far) = self.clipping_range;
        if self.parallel_projection {
            let half_height = self.parallel_scale;
            let half_width = half_height * aspect;
            DMat4::orthographic_rh(-half_width, half_width, -half_height, half_height, near, far)
        } else {
            DMat4::perspective_rh(self.view_angle.to_radians(), aspect, near, far)
        }
    }
}

/// Projects between world and display coordinates for one view.
///
/// Display coordinates are pixels inside `viewport` with `y` growing upwards
/// and a depth value in `[0, 1]` between the camera clipping planes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderer {
    /// The view's area in display pixels.
    pub viewport: Rect,
    /// The camera looking into the scene.
    pub camera: Camera,
    /// Size of the physical screen in pixels.
    pub screen_size: Size,
}

impl Renderer {
    /// Creates a renderer for `viewport` with a default camera.
    ///
    /// The screen is assumed to be the size of the viewport.
    #[must_use]
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            camera: Camera::default(),
            screen_size: viewport.size(),
        }
    }

    fn aspect(&self) -> f64 {
        let height = self.viewport.height();
        if height > 0.0 {
            self.viewport.width() / height
        } else {
            1.0
        }
    }

    /// World to clip coordinates.
    #[must_use]
    pub fn world_to_clip(&self) -> DMat4 {
        self.camera.projection_matrix(self.aspect()) * self.camera.view_matrix()
    }

    /// Projects a world point to display coordinates.
    ///
    /// Points on the eye plane have no projection; the viewport centre is
    /// returned for them.
    #[must_use]
    pub fn world_to_display(&self, world: DVec3) -> DVec3 {
        let clip = self.world_to_clip() * world.extend(1.0);
        if clip.w.abs() <= f64::EPSILON {
            let centre = self.viewport.center();
            return DVec3::new(centre.x, centre.y, 0.0);
        }
        let ndc = clip.truncate() / clip.w;
        DVec3::new(
            self.viewport.x0 + (ndc.x + 1.0) / 2.0 * self.viewport.width(),
            self.viewport.y0 + (ndc.y + 1.0) / 2.0 * self.viewport.height(),
            ndc.z,
        )
    }

    /// Unprojects a display point at `depth` back to world coordinates.
    ///
    /// Returns `None` for an empty viewport or a degenerate camera.
    #[must_use]
    pub fn display_to_world(&self, display: Point, depth: f64) -> Option<DVec3> {
        let (width, height) = (self.viewport.width(), self.viewport.height());
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let world_to_clip = self.world_to_clip();
        let determinant = world_to_clip.determinant();
        if determinant.abs() <= f64::EPSILON || !determinant.is_finite() {
            log::debug!("display_to_world: camera projection is singular");
            return None;
        }
        let ndc = DVec3::new(
            (display.x - self.viewport.x0) / width * 2.0 - 1.0,
            (display.y - self.viewport.y0) / height * 2.0 - 1.0,
            depth,
        );
        Some(world_to_clip.inverse().project_point3(ndc))
    }

    /// Display depth of the camera focal point.
    #[must_use]
    pub fn focal_depth(&self) -> f64 {
        self.world_to_display(self.camera.focal_point).z
    }

    /// World units covered by one display pixel at `world`.
    ///
    /// With parallel projection this is constant across the view. With
    /// perspective projection, two points one unit above and below `world`
    /// along the view-up direction are projected and their pixel distance
    /// measured.
    #[must_use]
    pub fn view_scale_factor_at(&self, world: DVec3) -> f64 {
        if self.camera.parallel_projection {
            let height = self.viewport.height();
            return if height > 0.0 {
                2.0 * self.camera.parallel_scale / height
            } else {
                1.0
            };
        }
        let up = self.camera.view_up.normalize_or_zero();
        let a = self.world_to_display(world + up);
        let b = self.world_to_display(world - up);
        let pixels = (a.x - b.x).hypot(a.y - b.y);
        if pixels > MIN_SCALE_PIXELS {
            2.0 / pixels
        } else {
            1.0
        }
    }
}
