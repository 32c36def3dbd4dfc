// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use glam::{DMat4, DVec3};
use kurbo::{Line, Point, Vec2};
use reslice_geometry::handle_to_world_transform;
use reslice_scene::{DisplaySettings, HandlesVisibilityMode, IntersectionMode, PlaneId};

use crate::IntersectionConfig;
use crate::glyph::{HANDLE_POINT_COUNT, rotation_handle_points, slice_offset_handle_points};

/// Where the two half-lines of one intersection sit in the current view.
///
/// All points are in the current view's pixel space. Index 0 and 1 are the
/// two sides of the crossing point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineLayout {
    /// Where the other plane's footprint crosses the current plane.
    pub raw_tips: [Point; 2],
    /// Raw tips pulled inside the handle margin of the view.
    pub outer_tips: [Point; 2],
    /// Ends of the half-lines near the crossing point.
    pub inner_tips: [Point; 2],
    /// Common crossing point of all intersection lines.
    pub intersection_point: Point,
    /// Offset of the thick-slab boundaries from the line, when a slab is shown.
    pub slab_offset: Option<Vec2>,
}

/// Composite visibility of every drawable part of a pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineVisibility {
    /// Both half-lines.
    pub intersection_lines: bool,
    /// The four thick-slab boundary lines.
    pub thick_slab_lines: bool,
    /// Translation disc at the crossing point.
    pub translation_handle: bool,
    /// Arc-arrow handle at each outer tip.
    pub rotation_handles: [bool; 2],
    /// Double-arrow handle halfway along each half-line.
    pub slice_offset_handles: [bool; 2],
    /// Double-arrow handle on each thick-slab boundary.
    pub thick_slab_handles: [bool; 4],
}

/// Renderable state for the intersection of one other plane with the current view.
///
/// A pipeline holds two half-lines split around the common crossing point,
/// up to four thick-slab boundary lines, and the handles placed on them: a
/// translation disc, two rotation arcs, two slice-offset arrows and four
/// thick-slab arrows. Each handle glyph has a placement transform and a
/// displayable flag; handles on half-lines too short to grab are not
/// displayable.
///
/// Visibility is the combination of independent switches. The setters only
/// raise [`needs_render`](Self::needs_render) when the composite visibility
/// actually changes.
#[derive(Clone, Debug)]
pub struct DisplayPipeline {
    other: PlaneId,

    translation_enabled: bool,
    rotation_enabled: bool,
    thick_slab_interactive: bool,
    handles_visibility_mode: HandlesVisibilityMode,
    intersection_mode: IntersectionMode,
    line_width: f64,

    raw_tips: Option<[Point; 2]>,
    intersection_lines: [Line; 2],
    thick_slab_lines: [Line; 4],
    has_thick_slab: bool,
    translation_handle_position: Point,
    rotation_handle_to_world: [DMat4; 2],
    slice_offset_handle_to_world: [DMat4; 2],
    thick_slab_handle_to_world: [DMat4; 4],
    rotation_handle_displayable: [bool; 2],
    slice_offset_handle_displayable: [bool; 2],
    thick_slab_handle_displayable: [bool; 4],

    rotation_glyph: [DVec3; HANDLE_POINT_COUNT],
    slice_offset_glyph: [DVec3; HANDLE_POINT_COUNT],
    rotation_handle_points: Vec<Point>,
    translation_handle_points: Vec<Point>,
    slice_offset_handle_points: Vec<Point>,
    thick_slab_handle_points: Vec<Point>,

    intersections_visible: bool,
    thickness_visible: bool,
    handles_visible: bool,
    thick_slab_handles_visible: bool,
    handles_opacity: f64,
    needs_render: bool,
}

impl DisplayPipeline {
    /// Creates a hidden pipeline for the intersection with `other`.
    #[must_use]
    pub fn new(other: PlaneId) -> Self {
        let settings = DisplaySettings::default();
        Self {
            other,
            translation_enabled: settings.translation_enabled(),
            rotation_enabled: settings.rotation_enabled(),
            thick_slab_interactive: settings.thick_slab_interactive(),
            handles_visibility_mode: settings.handles_visibility_mode,
            intersection_mode: settings.intersection_mode,
            line_width: settings.line_thickness.width(),
            raw_tips: None,
            intersection_lines: [Line::new(Point::ORIGIN, Point::ORIGIN); 2],
            thick_slab_lines: [Line::new(Point::ORIGIN, Point::ORIGIN); 4],
            has_thick_slab: false,
            translation_handle_position: Point::ORIGIN,
            rotation_handle_to_world: [DMat4::IDENTITY; 2],
            slice_offset_handle_to_world: [DMat4::IDENTITY; 2],
            thick_slab_handle_to_world: [DMat4::IDENTITY; 4],
            rotation_handle_displayable: [false; 2],
            slice_offset_handle_displayable: [false; 2],
            thick_slab_handle_displayable: [false; 4],
            rotation_glyph: rotation_handle_points(),
            slice_offset_glyph: slice_offset_handle_points(),
            rotation_handle_points: Vec::new(),
            translation_handle_points: Vec::new(),
            slice_offset_handle_points: Vec::new(),
            thick_slab_handle_points: Vec::new(),
            intersections_visible: false,
            thickness_visible: false,
            handles_visible: false,
            thick_slab_handles_visible: false,
            handles_opacity: 0.0,
            needs_render: false,
        }
    }

    /// The plane whose intersection this pipeline shows.
    #[must_use]
    pub fn other_plane(&self) -> PlaneId {
        self.other
    }

    /// Copies the switches that shape this pipeline from the other plane's
    /// display settings.
    pub fn apply_settings(&mut self, settings: &DisplaySettings) {
        let before = self.visibility();
        self.translation_enabled = settings.translation_enabled();
        self.rotation_enabled = settings.rotation_enabled();
        self.handles_visibility_mode = settings.handles_visibility_mode;
        self.intersection_mode = settings.intersection_mode;
        let width = settings.line_thickness.width();
        if self.line_width != width {
            self.line_width = width;
            self.needs_render = true;
        }
        self.mark_if_changed(before);
    }

    /// Allows or forbids thick-slab handles, following the current view's settings.
    pub fn set_thick_slab_interactive(&mut self, interactive: bool) {
        let before = self.visibility();
        self.thick_slab_interactive = interactive;
        self.mark_if_changed(before);
    }

    /// Handle visibility policy copied from the other plane.
    #[must_use]
    pub fn handles_visibility_mode(&self) -> HandlesVisibilityMode {
        self.handles_visibility_mode
    }

    /// Gap handling copied from the other plane.
    #[must_use]
    pub fn intersection_mode(&self) -> IntersectionMode {
        self.intersection_mode
    }

    /// Line width in pixels.
    #[must_use]
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Tips of the intersection line before clipping, if the planes cross.
    #[must_use]
    pub fn raw_tips(&self) -> Option<[Point; 2]> {
        self.raw_tips
    }

    pub(crate) fn set_raw_tips(&mut self, tips: Option<[Point; 2]>) {
        self.raw_tips = tips;
    }

    /// The rendered half-lines, each from the raw tip to the inner tip.
    #[must_use]
    pub fn intersection_lines(&self) -> &[Line; 2] {
        &self.intersection_lines
    }

    /// Thick-slab boundary lines: side 0 shifted forward and back, then side 1.
    ///
    /// Returns `None` when no slab is shown for the other plane.
    #[must_use]
    pub fn thick_slab_lines(&self) -> Option<&[Line; 4]> {
        self.has_thick_slab.then_some(&self.thick_slab_lines)
    }

    /// Centre of the translation disc.
    #[must_use]
    pub fn translation_handle_position(&self) -> Point {
        self.translation_handle_position
    }

    /// Placement of the two rotation glyphs.
    #[must_use]
    pub fn rotation_handle_to_world(&self) -> &[DMat4; 2] {
        &self.rotation_handle_to_world
    }

    /// Placement of the two slice-offset glyphs.
    #[must_use]
    pub fn slice_offset_handle_to_world(&self) -> &[DMat4; 2] {
        &self.slice_offset_handle_to_world
    }

    /// Placement of the four thick-slab glyphs.
    #[must_use]
    pub fn thick_slab_handle_to_world(&self) -> &[DMat4; 4] {
        &self.thick_slab_handle_to_world
    }

    /// Whether each rotation handle has room on its half-line.
    #[must_use]
    pub fn rotation_handle_displayable(&self) -> [bool; 2] {
        self.rotation_handle_displayable
    }

    /// Whether each slice-offset handle has room on its half-line.
    #[must_use]
    pub fn slice_offset_handle_displayable(&self) -> [bool; 2] {
        self.slice_offset_handle_displayable
    }

    /// Whether each thick-slab handle has room on its boundary line.
    #[must_use]
    pub fn thick_slab_handle_displayable(&self) -> [bool; 4] {
        self.thick_slab_handle_displayable
    }

    /// Hit-test points of the rotation handles and the line parts near them.
    #[must_use]
    pub fn rotation_handle_points(&self) -> &[Point] {
        &self.rotation_handle_points
    }

    /// Hit-test point of the translation disc.
    #[must_use]
    pub fn translation_handle_points(&self) -> &[Point] {
        &self.translation_handle_points
    }

    /// Hit-test points of the slice-offset handles and the line parts near them.
    #[must_use]
    pub fn slice_offset_handle_points(&self) -> &[Point] {
        &self.slice_offset_handle_points
    }

    /// Hit-test points of the thick-slab handles.
    #[must_use]
    pub fn thick_slab_handle_points(&self) -> &[Point] {
        &self.thick_slab_handle_points
    }

    /// Whether the intersection lines are shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.intersections_visible
    }

    /// Current handle opacity.
    #[must_use]
    pub fn handles_opacity(&self) -> f64 {
        self.handles_opacity
    }

    /// Composite visibility of every part.
    #[must_use]
    pub fn visibility(&self) -> PipelineVisibility {
        let shown = self.handles_visible
            && self.handles_visibility_mode != HandlesVisibilityMode::NeverVisible;
        let rotation = shown && self.rotation_enabled;
        let translation = shown && self.translation_enabled;
        let slab_lines = self.thickness_visible && self.has_thick_slab;
        let slab_handles = self.thick_slab_handles_visible
            && self.handles_visibility_mode != HandlesVisibilityMode::NeverVisible
            && self.thick_slab_interactive
            && self.has_thick_slab;
        PipelineVisibility {
            intersection_lines: self.intersections_visible,
            thick_slab_lines: slab_lines,
            translation_handle: translation
                && self.intersection_mode == IntersectionMode::FullLines,
            rotation_handles: self.rotation_handle_displayable.map(|d| rotation && d),
            slice_offset_handles: self.slice_offset_handle_displayable.map(|d| translation && d),
            thick_slab_handles: self.thick_slab_handle_displayable.map(|d| slab_handles && d),
        }
    }

    /// Shows or hides the intersection lines.
    pub fn set_intersections_visibility(&mut self, visible: bool) {
        let before = self.visibility();
        self.intersections_visible = visible;
        self.mark_if_changed(before);
    }

    /// Shows or hides the thick-slab boundary lines.
    pub fn set_thickness_visibility(&mut self, visible: bool) {
        let before = self.visibility();
        self.thickness_visible = visible;
        self.mark_if_changed(before);
    }

    /// Shows or hides the intersection handles.
    pub fn set_handles_visibility(&mut self, visible: bool) {
        let before = self.visibility();
        self.handles_visible = visible;
        self.mark_if_changed(before);
    }

    /// Shows or hides the thick-slab handles.
    pub fn set_thick_slab_handles_visibility(&mut self, visible: bool) {
        let before = self.visibility();
        self.thick_slab_handles_visible = visible;
        self.mark_if_changed(before);
    }

    /// Sets the opacity of every handle.
    pub fn set_handles_opacity(&mut self, opacity: f64) {
        if self.handles_opacity != opacity {
            self.handles_opacity = opacity;
            self.needs_render = true;
        }
    }

    /// Hides everything.
    pub fn hide(&mut self) {
        self.set_intersections_visibility(false);
        self.set_thickness_visibility(false);
        self.set_handles_visibility(false);
        self.set_thick_slab_handles_visibility(false);
    }

    /// Whether something changed since the last render.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Returns and clears the render request.
    pub fn take_needs_render(&mut self) -> bool {
        core::mem::take(&mut self.needs_render)
    }

    fn mark_if_changed(&mut self, before: PipelineVisibility) {
        if self.visibility() != before {
            self.needs_render = true;
        }
    }

    /// Places lines and handles for a new layout and rebuilds the hit-test
    /// point lists.
    pub fn place(&mut self, layout: &LineLayout, config: &IntersectionConfig) {
        let LineLayout {
            raw_tips,
            outer_tips,
            inner_tips,
            intersection_point,
            slab_offset,
        } = *layout;

        self.intersection_lines = [
            Line::new(raw_tips[0], inner_tips[0]),
            Line::new(raw_tips[1], inner_tips[1]),
        ];

        let lines = [outer_tips[0] - inner_tips[0], outer_tips[1] - inner_tips[1]];
        self.rotation_handle_displayable = displayable_sides(lines, config.handles_min_line_length);
        self.slice_offset_handle_displayable = self.rotation_handle_displayable;

        self.translation_handle_position = intersection_point;
        self.translation_handle_points.clear();
        self.translation_handle_points.push(intersection_point);

        let rotation_positions = outer_tips;
        self.rotation_handle_to_world = [0, 1].map(|i| {
            let orientation = Vec2::new(
                inner_tips[i].y - outer_tips[i].y,
                outer_tips[i].x - inner_tips[i].x,
            );
            handle_to_world_transform(
                to_dvec2(rotation_positions[i].to_vec2()),
                to_dvec2(orientation),
            )
        });

        let slice_offset_positions =
            rotation_positions.map(|p| p.midpoint(intersection_point));
        let slice_offset_orientation = Vec2::new(
            outer_tips[1].y - outer_tips[0].y,
            outer_tips[0].x - outer_tips[1].x,
        );
        self.slice_offset_handle_to_world = slice_offset_positions.map(|p| {
            handle_to_world_transform(to_dvec2(p.to_vec2()), to_dvec2(slice_offset_orientation))
        });

        self.rotation_handle_points.clear();
        self.slice_offset_handle_points.clear();
        for side in 0..2 {
            if self.rotation_handle_displayable[side] {
                let m = self.rotation_handle_to_world[side];
                self.rotation_handle_points
                    .extend(self.rotation_glyph.iter().map(|p| transform_point(m, *p)));
            }
        }
        for side in 0..2 {
            if self.slice_offset_handle_displayable[side] {
                let m = self.slice_offset_handle_to_world[side];
                self.slice_offset_handle_points
                    .extend(self.slice_offset_glyph.iter().map(|p| transform_point(m, *p)));
            }
        }

        // Points along each rendered half-line go to whichever handle is closer.
        let resolution = config.line_resolution.max(1);
        for side in 0..2 {
            let line = self.intersection_lines[side];
            for step in 0..=resolution {
                let t = f64::from(step) / f64::from(resolution);
                let point = line.p0.lerp(line.p1, t);
                if point.distance(rotation_positions[side])
                    < point.distance(slice_offset_positions[side])
                {
                    self.rotation_handle_points.push(point);
                } else {
                    self.slice_offset_handle_points.push(point);
                }
            }
        }

        self.place_thick_slab(layout, config);
        self.needs_render = true;
    }

    fn place_thick_slab(&mut self, layout: &LineLayout, config: &IntersectionConfig) {
        self.thick_slab_handle_points.clear();
        let Some(offset) = layout.slab_offset else {
            self.has_thick_slab = false;
            self.thick_slab_handle_displayable = [false; 4];
            return;
        };
        self.has_thick_slab = true;

        let shifts = [offset, -offset, offset, -offset];
        for (i, shift) in shifts.into_iter().enumerate() {
            let line = self.intersection_lines[i / 2];
            self.thick_slab_lines[i] = Line::new(line.p0 + shift, line.p1 + shift);
            self.thick_slab_handle_to_world[i] =
                DMat4::from_translation(DVec3::new(shift.x, shift.y, 0.0))
                    * self.slice_offset_handle_to_world[i / 2];
        }

        let lines = [
            layout.outer_tips[0] - layout.inner_tips[0],
            layout.outer_tips[1] - layout.inner_tips[1],
        ];
        let sides = displayable_sides(lines, config.thick_slab_handles_min_line_length);
        self.thick_slab_handle_displayable = [sides[0], sides[0], sides[1], sides[1]];
        for i in 0..4 {
            if self.thick_slab_handle_displayable[i] {
                let m = self.thick_slab_handle_to_world[i];
                self.thick_slab_handle_points
                    .extend(self.slice_offset_glyph.iter().map(|p| transform_point(m, *p)));
            }
        }
    }
}

/// Decides which half-lines are long enough to carry handles.
///
/// When both half-lines point the same way (the crossing point lies outside
/// the segment) only the longer one keeps its handles.
fn displayable_sides(lines: [Vec2; 2], min_length: f64) -> [bool; 2] {
    let lengths = lines.map(Vec2::hypot);
    let mut displayable = lengths.map(|len| len > min_length);
    // A collapsed half-line has no direction; the length test already hides it.
    let same_direction = lengths.iter().all(|len| *len > 0.0) && lines[0].dot(lines[1]) > 0.0;
    if same_direction {
        if lengths[0] < lengths[1] {
            displayable[0] = false;
        } else {
            displayable[1] = false;
        }
    }
    displayable
}

fn to_dvec2(v: Vec2) -> glam::DVec2 {
    glam::DVec2::new(v.x, v.y)
}

fn transform_point(m: DMat4, p: DVec3) -> Point {
    let p = m.transform_point3(p);
    Point::new(p.x, p.y)
}
