// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::DVec3;
use kurbo::Point;
use reslice_scene::{PlaneId, ViewPlane};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::Renderer;

/// Default pointer picking tolerance in pixels.
pub const DEFAULT_PICKING_TOLERANCE: f64 = 30.0;

/// Screen diagonal assumed until a renderer reports a real screen size.
const DEFAULT_SCREEN_SIZE_PIXEL: f64 = 1000.0;

/// How the interaction (handle) size is chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionSizeMode {
    /// Percentage of the screen diagonal.
    Relative(f64),
    /// Fixed size in world units.
    Absolute(f64),
}

impl Default for InteractionSizeMode {
    fn default() -> Self {
        Self::Relative(3.0)
    }
}

/// State shared by all widget representations.
///
/// A representation draws a widget into one view. For slice views
/// (`view_plane` set) sizes are measured in the plane's pixel space; for 3D
/// views they are measured in world units.
#[derive(Clone, Debug)]
pub struct WidgetRepresentation {
    renderer: Option<Renderer>,
    view_plane: Option<PlaneId>,
    needs_render: bool,
    picking_tolerance: f64,
    screen_scale_factor: f64,
    interaction_size: f64,
    interaction_size_mode: InteractionSizeMode,
    view_scale_factor_mm_per_pixel: f64,
    screen_size_pixel: f64,
}

impl Default for WidgetRepresentation {
    fn default() -> Self {
        Self {
            renderer: None,
            view_plane: None,
            needs_render: false,
            picking_tolerance: DEFAULT_PICKING_TOLERANCE,
            screen_scale_factor: 1.0,
            interaction_size: 1.0,
            interaction_size_mode: InteractionSizeMode::default(),
            view_scale_factor_mm_per_pixel: 1.0,
            screen_size_pixel: DEFAULT_SCREEN_SIZE_PIXEL,
        }
    }
}

impl WidgetRepresentation {
    /// Creates a representation with no renderer and no view plane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the renderer, if one is attached.
    #[must_use]
    pub fn renderer(&self) -> Option<&Renderer> {
        self.renderer.as_ref()
    }

    /// Attaches or detaches the renderer.
    pub fn set_renderer(&mut self, renderer: Option<Renderer>) {
        self.renderer = renderer;
        self.needs_render = true;
    }

    /// Returns the slice view plane this representation draws into.
    #[must_use]
    pub fn view_plane(&self) -> Option<PlaneId> {
        self.view_plane
    }

    /// Sets the slice view plane; `None` makes this a 3D view representation.
    pub fn set_view_plane(&mut self, plane: Option<PlaneId>) {
        if self.view_plane != plane {
            self.view_plane = plane;
            self.needs_render = true;
        }
    }

    /// Whether something changed since the last render.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Requests a render.
    pub fn set_needs_render(&mut self) {
        self.needs_render = true;
    }

    /// Clears the render request.
    pub fn clear_needs_render(&mut self) {
        self.needs_render = false;
    }

    /// Returns and clears the render request.
    pub fn take_needs_render(&mut self) -> bool {
        core::mem::take(&mut self.needs_render)
    }

    /// Pointer picking tolerance in pixels.
    #[must_use]
    pub fn picking_tolerance(&self) -> f64 {
        self.picking_tolerance
    }

    /// Sets the pointer picking tolerance in pixels.
    pub fn set_picking_tolerance(&mut self, tolerance: f64) {
        self.picking_tolerance = tolerance;
    }

    /// Ratio of physical to logical pixels.
    #[must_use]
    pub fn screen_scale_factor(&self) -> f64 {
        self.screen_scale_factor
    }

    /// Sets the ratio of physical to logical pixels.
    pub fn set_screen_scale_factor(&mut self, factor: f64) {
        self.screen_scale_factor = factor;
    }

    /// Handle size: pixels for slice views, world units for 3D views.
    #[must_use]
    pub fn interaction_size(&self) -> f64 {
        self.interaction_size
    }

    /// Sets the handle size directly.
    pub fn set_interaction_size(&mut self, size: f64) {
        if self.interaction_size != size {
            self.interaction_size = size;
            self.needs_render = true;
        }
    }

    /// How [`update_interaction_size`](Self::update_interaction_size) sizes handles.
    #[must_use]
    pub fn interaction_size_mode(&self) -> InteractionSizeMode {
        self.interaction_size_mode
    }

    /// Sets the handle sizing mode.
    pub fn set_interaction_size_mode(&mut self, mode: InteractionSizeMode) {
        self.interaction_size_mode = mode;
    }

    /// World units per pixel computed by the last
    /// [`update_view_scale_factor`](Self::update_view_scale_factor).
    #[must_use]
    pub fn view_scale_factor_mm_per_pixel(&self) -> f64 {
        self.view_scale_factor_mm_per_pixel
    }

    /// Screen diagonal in pixels computed by the last
    /// [`update_view_scale_factor`](Self::update_view_scale_factor).
    #[must_use]
    pub fn screen_size_pixel(&self) -> f64 {
        self.screen_size_pixel
    }

    /// Recomputes the screen diagonal and the world units per pixel.
    ///
    /// For a slice view (`plane` given) the scale is read from the plane's
    /// pixel spacing. Otherwise two points on the left and right viewport
    /// edges are unprojected at the focal depth and their distance divided
    /// by the viewport width. Without a renderer, or before the screen size
    /// is known, the defaults of one unit per pixel and a 1000 pixel
    /// diagonal are kept.
    pub fn update_view_scale_factor(&mut self, plane: Option<&ViewPlane>) {
        self.view_scale_factor_mm_per_pixel = 1.0;
        self.screen_size_pixel = DEFAULT_SCREEN_SIZE_PIXEL;
        let Some(renderer) = &self.renderer else {
            return;
        };
        let diagonal = renderer
            .screen_size
            .width
            .hypot(renderer.screen_size.height);
        if diagonal < 1.0 {
            return;
        }
        self.screen_size_pixel = diagonal;

        if let Some(plane) = plane {
            self.view_scale_factor_mm_per_pixel = plane.mm_per_pixel();
            return;
        }

        let viewport = renderer.viewport;
        if viewport.width() <= 0.0 {
            return;
        }
        let depth = renderer.focal_depth();
        let y = viewport.center().y;
        let left = renderer.display_to_world(Point::new(viewport.x0, y), depth);
        let right = renderer.display_to_world(Point::new(viewport.x1, y), depth);
        if let (Some(left), Some(right)) = (left, right) {
            self.view_scale_factor_mm_per_pixel = left.distance(right) / viewport.width();
        }
    }

    /// Recomputes the handle size from the sizing mode.
    ///
    /// Relative sizes are a percentage of the screen diagonal, scaled by the
    /// screen scale factor. The result is in pixels for slice views and in
    /// world units for 3D views.
    pub fn update_interaction_size(&mut self, slice_view: bool) {
        let mm_per_pixel = self.view_scale_factor_mm_per_pixel;
        let size = match self.interaction_size_mode {
            InteractionSizeMode::Relative(percent) => {
                let pixels = self.screen_size_pixel * self.screen_scale_factor * percent / 100.0;
                if slice_view {
                    pixels
                } else {
                    pixels * mm_per_pixel
                }
            }
            InteractionSizeMode::Absolute(mm) => {
                if slice_view && mm_per_pixel > 0.0 {
                    mm / mm_per_pixel
                } else {
                    mm
                }
            }
        };
        self.set_interaction_size(size);
    }

    /// Projects a world point into this representation's view.
    ///
    /// Slice views map through the plane's `world_to_xy`; 3D views go through
    /// the renderer. Returns `None` for a 3D view without a renderer.
    #[must_use]
    pub fn world_to_display(&self, world: DVec3, plane: Option<&ViewPlane>) -> Option<DVec3> {
        match plane {
            Some(plane) => Some(plane.world_to_xy().transform_point3(world)),
            None => self.renderer.as_ref().map(|r| r.world_to_display(world)),
        }
    }
}
