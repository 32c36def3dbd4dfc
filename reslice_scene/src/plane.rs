// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View planes: pose, field of view and pixel dimensions of a 2D slice view.

use alloc::string::String;
use glam::{DMat4, DVec2, DVec3};

/// How [`ViewPlane::jump_to`] moves a plane onto a point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JumpMode {
    /// Slide the plane along its normal; the in-plane position is kept.
    #[default]
    Offset,
    /// Move the plane origin onto the point, recentring the view on it.
    Centered,
}

/// Thick-slab (oblique reformat) settings of a plane.
///
/// When enabled, the view shows a slab of `thickness` world units centred on
/// the plane rather than a single cut.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SlabReconstruction {
    /// Whether slab reconstruction is active.
    pub enabled: bool,
    /// Full slab thickness in world units.
    pub thickness: f64,
}

/// A 2D cutting plane through the 3D scene, shown in one view.
///
/// Pixel (`XY`) coordinates run from `(0, 0)` to `dimensions` with `z = 0` on
/// the plane. `slice_to_world` places the plane in the world; the pixel to
/// slice mapping follows from `field_of_view`, `dimensions` and `xyz_origin`.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewPlane {
    /// Human-readable name, e.g. the layout name of the view.
    pub name: String,
    /// Pose of the plane: slice coordinates to world coordinates.
    pub slice_to_world: DMat4,
    /// Extent of the view in world units along slice x, y and z.
    pub field_of_view: DVec3,
    /// Size of the view in pixels.
    pub dimensions: (u32, u32),
    /// Offset of the view centre in slice coordinates.
    pub xyz_origin: DVec3,
    /// Planes only intersect other planes of the same group.
    pub view_group: i32,
    /// Whether the view is currently shown in the layout.
    pub mapped_in_layout: bool,
    /// Thick-slab settings.
    pub slab: SlabReconstruction,
    /// Behaviour of [`ViewPlane::jump_to`].
    pub jump_mode: JumpMode,
}

impl ViewPlane {
    /// Creates a mapped plane with an identity pose and square pixels.
    ///
    /// The field of view is `dimensions` scaled by `mm_per_pixel`, with a
    /// depth of one world unit.
    #[must_use]
    pub fn new(name: impl Into<String>, dimensions: (u32, u32), mm_per_pixel: f64) -> Self {
        Self {
            name: name.into(),
            slice_to_world: DMat4::IDENTITY,
            field_of_view: DVec3::new(
                f64::from(dimensions.0) * mm_per_pixel,
                f64::from(dimensions.1) * mm_per_pixel,
                1.0,
            ),
            dimensions,
            xyz_origin: DVec3::ZERO,
            view_group: 0,
            mapped_in_layout: true,
            slab: SlabReconstruction::default(),
            jump_mode: JumpMode::default(),
        }
    }

    /// Sets the pose and returns `self`.
    #[must_use]
    pub fn with_slice_to_world(mut self, slice_to_world: DMat4) -> Self {
        self.slice_to_world = slice_to_world;
        self
    }

    /// Sets the view group and returns `self`.
    #[must_use]
    pub fn with_view_group(mut self, view_group: i32) -> Self {
        self.view_group = view_group;
        self
    }

    /// Pixel to slice coordinates.
    #[must_use]
    pub fn xy_to_slice(&self) -> DMat4 {
        let width = f64::from(self.dimensions.0.max(1));
        let height = f64::from(self.dimensions.1.max(1));
        let spacing = DVec3::new(
            self.field_of_view.x / width,
            self.field_of_view.y / height,
            self.field_of_view.z,
        );
        let translation = DVec3::new(
            -self.field_of_view.x / 2.0 + self.xyz_origin.x,
            -self.field_of_view.y / 2.0 + self.xyz_origin.y,
            self.xyz_origin.z,
        );
        DMat4::from_translation(translation) * DMat4::from_scale(spacing)
    }

    /// Pixel to world coordinates.
    #[must_use]
    pub fn xy_to_world(&self) -> DMat4 {
        self.slice_to_world * self.xy_to_slice()
    }

    /// World to pixel coordinates.
    ///
    /// A degenerate pose (zero field of view or singular pose) yields the
    /// identity.
    #[must_use]
    pub fn world_to_xy(&self) -> DMat4 {
        let xy_to_world = self.xy_to_world();
        let determinant = xy_to_world.determinant();
        if determinant.abs() <= f64::EPSILON || !determinant.is_finite() {
            log::warn!("view plane {:?} has a singular pose", self.name);
            return DMat4::IDENTITY;
        }
        xy_to_world.inverse()
    }

    /// Plane origin in world coordinates.
    #[must_use]
    pub fn origin(&self) -> DVec3 {
        self.slice_to_world.w_axis.truncate()
    }

    /// Unit normal of the plane in world coordinates.
    #[must_use]
    pub fn normal(&self) -> DVec3 {
        self.slice_to_world
            .z_axis
            .truncate()
            .try_normalize()
            .unwrap_or(DVec3::Z)
    }

    /// World units covered by one pixel along the view's vertical axis.
    #[must_use]
    pub fn mm_per_pixel(&self) -> f64 {
        let column = self.xy_to_slice().y_axis;
        DVec2::new(column.x, column.y).length()
    }

    /// Centre of the view in pixel coordinates.
    #[must_use]
    pub fn center_xy(&self) -> DVec3 {
        DVec3::new(
            f64::from(self.dimensions.0) / 2.0,
            f64::from(self.dimensions.1) / 2.0,
            0.0,
        )
    }

    /// Moves the plane so that it passes through `point` (world coordinates).
    ///
    /// See [`JumpMode`] for how the in-plane position is treated.
    pub fn jump_to(&mut self, point: DVec3) {
        let origin = self.origin();
        let new_origin = match self.jump_mode {
            JumpMode::Offset => {
                let normal = self.normal();
                origin + normal * normal.dot(point - origin)
            }
            JumpMode::Centered => point,
        };
        self.slice_to_world.w_axis = new_origin.extend(1.0);
    }
}
