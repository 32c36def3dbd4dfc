// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use glam::{DMat4, DVec2, DVec3};
use kurbo::{Point, Rect, Vec2};
use reslice_geometry::{
    contains_strictly, extended_segment, line_tips_from_plane, segment_intersection,
    segment_viewport_intersection, shrink_bounds, slab_offset_in_plane, viewport_bounds,
};
use reslice_scene::{
    ComponentType, DisplaySettings, HandlesVisibilityMode, IntersectionMode, ObserverId, PlaneId,
    Scene, ViewPlane,
};
use reslice_view::{CursorShape, WidgetRepresentation};
use smallvec::SmallVec;

use crate::{
    DisplayPipeline, HandleInfo, InteractionHit, IntersectionConfig, LineLayout, PointerEvent,
};

/// Shows where every other view plane crosses the current one, and lets the
/// user grab those intersections.
///
/// The representation owns one [`DisplayPipeline`] per other plane, keyed by
/// the other plane's id. Planes are never held directly: every update reads
/// them from the [`Scene`] passed in. Plane changes reach the representation
/// through its scene observer; call [`process_notifications`] after mutating
/// the scene to bring the display up to date.
///
/// [`process_notifications`]: Self::process_notifications
#[derive(Debug)]
pub struct SliceIntersectionRepresentation {
    base: WidgetRepresentation,
    config: IntersectionConfig,
    observer: Option<ObserverId>,
    current: Option<PlaneId>,
    pipelines: Vec<DisplayPipeline>,
    intersection_point: DVec3,
    visible: bool,
    handles_visible: bool,
    handles_opacity: f64,
}

impl Default for SliceIntersectionRepresentation {
    fn default() -> Self {
        Self::new(IntersectionConfig::default())
    }
}

impl SliceIntersectionRepresentation {
    /// Creates a representation without a current plane.
    #[must_use]
    pub fn new(config: IntersectionConfig) -> Self {
        let mut base = WidgetRepresentation::new();
        base.set_interaction_size(config.interaction_size);
        base.set_picking_tolerance(config.picking_tolerance);
        base.set_screen_scale_factor(config.screen_scale_factor);
        base.clear_needs_render();
        Self {
            base,
            config,
            observer: None,
            current: None,
            pipelines: Vec::new(),
            intersection_point: DVec3::ZERO,
            visible: true,
            handles_visible: false,
            handles_opacity: 0.0,
        }
    }

    /// Shared representation state.
    #[must_use]
    pub fn base(&self) -> &WidgetRepresentation {
        &self.base
    }

    /// Mutable shared representation state.
    pub fn base_mut(&mut self) -> &mut WidgetRepresentation {
        &mut self.base
    }

    /// Tunable constants.
    #[must_use]
    pub fn config(&self) -> &IntersectionConfig {
        &self.config
    }

    /// The plane this representation draws into.
    #[must_use]
    pub fn current_plane(&self) -> Option<PlaneId> {
        self.current
    }

    /// All pipelines, in the order their planes were added.
    #[must_use]
    pub fn pipelines(&self) -> &[DisplayPipeline] {
        &self.pipelines
    }

    /// Number of tracked other planes.
    #[must_use]
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// The pipeline showing `other`, if it is tracked.
    #[must_use]
    pub fn pipeline(&self, other: PlaneId) -> Option<&DisplayPipeline> {
        self.pipelines.iter().find(|p| p.other_plane() == other)
    }

    /// Common crossing point of the intersection lines, in the current
    /// view's pixel space, as of the last update.
    #[must_use]
    pub fn slice_intersection_point(&self) -> DVec3 {
        self.intersection_point
    }

    /// Whether something changed since the last render.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.base.needs_render() || self.pipelines.iter().any(DisplayPipeline::needs_render)
    }

    /// Returns and clears the render request of the representation and every pipeline.
    pub fn take_needs_render(&mut self) -> bool {
        let mut needs_render = self.base.take_needs_render();
        for pipeline in &mut self.pipelines {
            needs_render |= pipeline.take_needs_render();
        }
        needs_render
    }

    /// Selects the plane to draw into and rebuilds the pipelines.
    ///
    /// One pipeline is created for every other plane of the scene. Passing
    /// `None`, or an id the scene does not know, leaves the representation
    /// without a current plane.
    pub fn set_current_plane(&mut self, scene: &mut Scene, plane: Option<PlaneId>) {
        let observer = self.observer(scene);
        if let Some(old) = self.current.take() {
            scene.unsubscribe(observer, old);
        }
        for pipeline in self.pipelines.drain(..) {
            scene.unsubscribe(observer, pipeline.other_plane());
        }
        self.base.set_view_plane(None);
        self.base.set_needs_render();

        let Some(id) = plane else {
            return;
        };
        if let Err(err) = scene.subscribe(observer, id) {
            log::warn!("cannot show slice intersections in {id:?}: {err}");
            return;
        }
        self.current = Some(id);
        self.base.set_view_plane(Some(id));

        let others: SmallVec<[PlaneId; 8]> = scene.plane_ids().filter(|p| *p != id).collect();
        for other in others {
            if scene.subscribe(observer, other).is_ok() {
                self.pipelines.push(DisplayPipeline::new(other));
            }
        }
        self.on_current_plane_changed(scene);
    }

    /// Starts showing the intersection with `other`.
    ///
    /// Does nothing for the current plane, an already tracked plane or an
    /// unknown id.
    pub fn add_other_plane(&mut self, scene: &mut Scene, other: PlaneId) {
        if self.current == Some(other) || self.pipeline(other).is_some() {
            return;
        }
        let observer = self.observer(scene);
        if let Err(err) = scene.subscribe(observer, other) {
            log::warn!("cannot track {other:?}: {err}");
            return;
        }
        self.pipelines.push(DisplayPipeline::new(other));
        self.on_current_plane_changed(scene);
    }

    /// Stops showing the intersection with `other`, returning whether it was tracked.
    pub fn remove_other_plane(&mut self, scene: &mut Scene, other: PlaneId) -> bool {
        let Some(index) = self.pipelines.iter().position(|p| p.other_plane() == other) else {
            return false;
        };
        self.pipelines.remove(index);
        if let Some(observer) = self.observer {
            scene.unsubscribe(observer, other);
        }
        self.base.set_needs_render();
        self.update_all(scene);
        true
    }

    /// Handles every plane change queued since the last call.
    ///
    /// Removed planes are dropped: the current one clears the representation,
    /// others lose their pipeline.
    pub fn process_notifications(&mut self, scene: &mut Scene) {
        let Some(observer) = self.observer else {
            return;
        };
        let mut changed: SmallVec<[PlaneId; 8]> = SmallVec::new();
        for id in scene.take_notifications(observer) {
            if !changed.contains(&id) {
                changed.push(id);
            }
        }
        for id in changed {
            if scene.contains(id) {
                self.on_plane_changed(scene, id);
            } else if self.current == Some(id) {
                self.set_current_plane(scene, None);
            } else {
                self.remove_other_plane(scene, id);
            }
        }
    }

    /// Reacts to a change of one plane.
    ///
    /// A change of the current plane moves every line, so all pipelines are
    /// recomputed and handle visibility is re-read from the active component.
    /// A change of another plane only recomputes that plane's pipeline. The
    /// shared crossing point is refreshed first, but the other pipelines keep
    /// their translation disc and gap where they were until the next
    /// [`update_all`](Self::update_all).
    pub fn on_plane_changed(&mut self, scene: &Scene, id: PlaneId) {
        if self.current == Some(id) {
            self.on_current_plane_changed(scene);
            return;
        }
        let Some(index) = self.pipelines.iter().position(|p| p.other_plane() == id) else {
            return;
        };
        let (Some(current), Some(settings)) = self.current_state(scene) else {
            return;
        };
        self.refresh_tips(scene, current, settings, index);
        self.intersection_point = self.compute_intersection_point(scene);
        self.layout_pipeline(scene, current, settings, index);
        self.sync_needs_render();
    }

    fn on_current_plane_changed(&mut self, scene: &Scene) {
        self.update_all(scene);
        let Some(id) = self.current else {
            return;
        };
        if let Some(plane) = scene.plane(id) {
            self.base.update_view_scale_factor(Some(plane));
        }
        let active = scene
            .display_settings(id)
            .map_or(ComponentType::None, |s| s.active_component.component);
        // Handles hide while nothing is hovered and while a drag is in progress.
        self.set_handles_visibility(active.is_handle());
    }

    /// Recomputes every pipeline.
    ///
    /// All raw lines are refreshed first, so that the crossing point they
    /// share is known before any pipeline lays out its gap and handles.
    pub fn update_all(&mut self, scene: &Scene) {
        let (Some(current), Some(settings)) = self.current_state(scene) else {
            for pipeline in &mut self.pipelines {
                pipeline.hide();
            }
            self.sync_needs_render();
            return;
        };
        for index in 0..self.pipelines.len() {
            self.refresh_tips(scene, current, settings, index);
        }
        self.intersection_point = self.compute_intersection_point(scene);
        for index in 0..self.pipelines.len() {
            self.layout_pipeline(scene, current, settings, index);
        }
        self.sync_needs_render();
    }

    fn current_state<'a>(
        &self,
        scene: &'a Scene,
    ) -> (Option<&'a ViewPlane>, Option<&'a DisplaySettings>) {
        match self.current {
            Some(id) => (scene.plane(id), scene.display_settings(id)),
            None => (None, None),
        }
    }

    /// Finds where the other plane crosses the current one, or hides the pipeline.
    fn refresh_tips(
        &mut self,
        scene: &Scene,
        current: &ViewPlane,
        current_settings: &DisplaySettings,
        index: usize,
    ) {
        let visible = self.visible;
        let pipeline = &mut self.pipelines[index];
        let other_id = pipeline.other_plane();
        let (Some(other), Some(other_settings)) =
            (scene.plane(other_id), scene.display_settings(other_id))
        else {
            pipeline.set_raw_tips(None);
            pipeline.hide();
            return;
        };

        let shown = visible
            && other.view_group == current.view_group
            && other.mapped_in_layout
            && other_settings.intersections_interactive();
        if !shown {
            pipeline.set_raw_tips(None);
            pipeline.hide();
            return;
        }

        pipeline.apply_settings(other_settings);
        pipeline.set_thick_slab_interactive(current_settings.thick_slab_interactive());
        let other_xy_to_current_xy = current.world_to_xy() * other.xy_to_world();
        let tips = line_tips_from_plane(other.dimensions, other_xy_to_current_xy)
            .filter(|(a, b)| a.distance_squared(*b) > 0.0);
        match tips {
            Some((a, b)) => pipeline.set_raw_tips(Some([to_point(a), to_point(b)])),
            None => {
                pipeline.set_raw_tips(None);
                pipeline.hide();
            }
        }
    }

    /// Averages the pairwise crossings of all shown intersection lines.
    ///
    /// Each line is extended far past its tips before intersecting, so that
    /// short but non-parallel lines still report their crossing. Without any
    /// crossing the pixel centre of the current plane is returned.
    pub fn compute_intersection_point(&self, scene: &Scene) -> DVec3 {
        let factor = self.config.extension_factor;
        let lines: SmallVec<[(DVec3, DVec3); 8]> = self
            .pipelines
            .iter()
            .filter_map(DisplayPipeline::raw_tips)
            .map(|[r, l]| extended_segment(to_dvec3(r), to_dvec3(l), factor))
            .collect();

        let mut sum = DVec3::ZERO;
        let mut count = 0_u32;
        for (i, first) in lines.iter().enumerate() {
            for second in &lines[i + 1..] {
                if let Some((u, _)) = segment_intersection(first.0, first.1, second.0, second.1) {
                    sum += first.0 + (first.1 - first.0) * u;
                    count += 1;
                }
            }
        }
        if count > 0 {
            return sum / f64::from(count);
        }

        let fallback = self
            .current
            .and_then(|id| scene.plane(id))
            .map_or(DVec3::ZERO, ViewPlane::center_xy);
        log::debug!("no intersecting line pairs, using view centre {fallback}");
        fallback
    }

    fn layout_pipeline(
        &mut self,
        scene: &Scene,
        current: &ViewPlane,
        current_settings: &DisplaySettings,
        index: usize,
    ) {
        let config = self.config;
        let pipeline = &mut self.pipelines[index];
        let Some(raw_tips) = pipeline.raw_tips() else {
            return;
        };
        let intersection_point = to_point(self.intersection_point);

        let bounds = viewport_bounds(
            current.slice_to_world,
            current.world_to_xy(),
            current.field_of_view,
        );
        let handle_bounds = shrink_bounds(bounds, config.handles_margin);
        // Tips are pulled inside the margin only while the crossing itself is.
        let outer_tips = raw_tips.map(|tip| {
            if contains_closed(handle_bounds, tip)
                || !contains_strictly(handle_bounds, intersection_point)
            {
                tip
            } else {
                segment_viewport_intersection(intersection_point, tip, handle_bounds).unwrap_or(tip)
            }
        });

        let inner_tips = match pipeline.intersection_mode() {
            IntersectionMode::FullLines => [intersection_point; 2],
            IntersectionMode::SkipLineCrossings => {
                let sides = outer_tips.map(|tip| tip - intersection_point);
                if sides[0].dot(sides[1]) > 0.0 {
                    // Both half-lines leave the crossing point the same way.
                    [outer_tips[0].midpoint(outer_tips[1]); 2]
                } else {
                    let gap = config.gap_fraction * bounds.width();
                    let mut inner = outer_tips;
                    for (tip, side) in inner.iter_mut().zip(sides) {
                        let length = side.hypot();
                        // A half-line no longer than the gap is not drawn at all.
                        if length > gap {
                            *tip = intersection_point + side * (gap / length);
                        }
                    }
                    inner
                }
            }
        };

        let slab_offset = scene.plane(pipeline.other_plane()).and_then(|other| {
            if !current_settings.thick_slab_visible()
                || !other.slab.enabled
                || other.slab.thickness <= 0.0
            {
                return None;
            }
            slab_offset_in_plane(current.xy_to_world(), other.normal(), other.slab.thickness / 2.0)
                .map(|v: DVec2| Vec2::new(v.x, v.y))
        });

        pipeline.place(
            &LineLayout {
                raw_tips,
                outer_tips,
                inner_tips,
                intersection_point,
                slab_offset,
            },
            &config,
        );
        pipeline.set_intersections_visibility(true);
        pipeline.set_thickness_visibility(current_settings.thick_slab_visible());
        apply_handle_state(pipeline, self.handles_visible, self.handles_opacity);
    }

    /// Shows or hides the handles of every pipeline.
    ///
    /// Pipelines whose plane always or never shows handles keep that setting.
    pub fn set_handles_visibility(&mut self, visible: bool) {
        self.handles_visible = visible;
        for pipeline in &mut self.pipelines {
            apply_handle_state(pipeline, visible, self.handles_opacity);
        }
        self.sync_needs_render();
    }

    /// Sets the handle opacity of every pipeline.
    ///
    /// Pipelines whose plane always shows handles stay fully opaque.
    pub fn set_handles_opacity(&mut self, opacity: f64) {
        self.handles_opacity = opacity;
        for pipeline in &mut self.pipelines {
            apply_handle_state(pipeline, self.handles_visible, opacity);
        }
        self.sync_needs_render();
    }

    /// Whether intersections are shown at all.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides every intersection.
    pub fn set_visibility(&mut self, scene: &Scene, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        self.update_all(scene);
    }

    /// Every pickable handle point, pipeline by pipeline.
    ///
    /// Within a pipeline points come in the order rotation, translation of
    /// all planes, translation of the single plane, thick slab. Pipelines
    /// whose lines are hidden contribute nothing. The intersection and
    /// handle visibility modes only change what is drawn: the translation
    /// disc is listed without a gap too, and hidden handles stay pickable.
    #[must_use]
    pub fn handle_infos(&self, scene: &Scene) -> Vec<HandleInfo> {
        let xy_to_world = self
            .current
            .and_then(|id| scene.plane(id))
            .map_or(DMat4::IDENTITY, ViewPlane::xy_to_world);
        let mut infos = Vec::new();
        for pipeline in &self.pipelines {
            if !pipeline.is_visible() {
                continue;
            }
            let owner = pipeline.other_plane();
            let mut push = |component: ComponentType, points: &[Point]| {
                infos.extend(points.iter().enumerate().map(|(index, p)| HandleInfo {
                    index,
                    component,
                    owner,
                    position_world: xy_to_world.transform_point3(to_dvec3(*p)),
                    position_local: *p,
                }));
            };
            push(
                ComponentType::RotateIntersectingSlices,
                pipeline.rotation_handle_points(),
            );
            push(
                ComponentType::TranslateIntersectingSlices,
                pipeline.translation_handle_points(),
            );
            push(
                ComponentType::TranslateSingleIntersectingSlice,
                pipeline.slice_offset_handle_points(),
            );
            if pipeline.thick_slab_lines().is_some() {
                push(
                    ComponentType::TranslateThickSlab,
                    pipeline.thick_slab_handle_points(),
                );
            }
        }
        infos
    }

    /// Finds the handle closest to the pointer.
    ///
    /// Handles closer than half the interaction size plus the picking
    /// tolerance can be picked. Beyond that, and up to
    /// [`IntersectionConfig::opacity_range`] further out in squared pixels,
    /// the returned opacity fades from one to zero so handles can appear as
    /// the pointer approaches.
    #[must_use]
    pub fn can_interact(&self, scene: &Scene, event: &PointerEvent) -> InteractionHit {
        let Some(settings) = self.current.and_then(|id| scene.display_settings(id)) else {
            return InteractionHit::MISS;
        };
        if event.display_position.is_none() && event.world_position.is_none() {
            return InteractionHit::MISS;
        }

        let tolerance = self.base.picking_tolerance() * self.base.screen_scale_factor();
        let max_distance = self.base.interaction_size() / 2.0 + tolerance;
        let max_distance2 = max_distance * max_distance;
        let extended_distance2 = max_distance2 + self.config.opacity_range;

        let mut hit = InteractionHit::MISS;
        for info in self.handle_infos(scene) {
            let enabled = match info.component {
                ComponentType::RotateIntersectingSlices => settings.rotation_enabled(),
                ComponentType::TranslateIntersectingSlices
                | ComponentType::TranslateSingleIntersectingSlice => settings.translation_enabled(),
                ComponentType::TranslateThickSlab => settings.thick_slab_interactive(),
                ComponentType::None | ComponentType::SliceIntersection => false,
            };
            if !enabled {
                continue;
            }

            if let Some(position) = event.display_position {
                let distance2 = (position - info.position_local).hypot2();
                if distance2 >= extended_distance2 {
                    continue;
                }
                if distance2 < max_distance2 {
                    hit.opacity = 1.0;
                    if hit.prefers(distance2, info.component) {
                        hit.pick(&info, distance2);
                    }
                } else {
                    let fade = (distance2 - extended_distance2) / -self.config.opacity_range;
                    hit.opacity = hit.opacity.max(fade);
                }
            } else if let Some(position) = event.world_position {
                let tolerance = self.base.interaction_size() / 2.0
                    + self.base.picking_tolerance() / event.world_to_physical_scale;
                let distance2 = position.distance_squared(info.position_world);
                if distance2 < tolerance * tolerance && hit.prefers(distance2, info.component) {
                    hit.opacity = 1.0;
                    hit.pick(&info, distance2);
                }
            }
        }
        log::trace!("hit test: {hit:?}");
        hit
    }

    /// Applies `delta` to the pose of every plane whose intersection is shown.
    ///
    /// All planes are opened for modification before any of them changes,
    /// so each notifies its observers once, after every pose has moved.
    pub fn transform_intersecting_slices(&mut self, scene: &mut Scene, delta: DMat4) {
        let targets: SmallVec<[PlaneId; 8]> = self
            .pipelines
            .iter()
            .filter(|p| p.is_visible())
            .map(DisplayPipeline::other_plane)
            .collect();
        let mut opened: SmallVec<[PlaneId; 8]> = SmallVec::new();
        for id in targets {
            match scene.start_modify(id) {
                Ok(_) => opened.push(id),
                Err(err) => log::warn!("cannot move {id:?}: {err}"),
            }
        }
        for id in &opened {
            let moved = scene.update_plane(*id, |plane| {
                plane.slice_to_world = delta * plane.slice_to_world;
            });
            if let Err(err) = moved {
                log::warn!("cannot move {id:?}: {err}");
            }
        }
        for id in opened {
            if let Err(err) = scene.end_modify(id) {
                log::warn!("unbalanced modification of {id:?}: {err}");
            }
        }
    }

    /// Returns `true` when `position` lies strictly inside the current view.
    #[must_use]
    pub fn is_cursor_in_view(&self, scene: &Scene, position: Point) -> bool {
        let Some(current) = self.current.and_then(|id| scene.plane(id)) else {
            return false;
        };
        let bounds = viewport_bounds(
            current.slice_to_world,
            current.world_to_xy(),
            current.field_of_view,
        );
        contains_strictly(bounds, position)
    }

    /// Direction of the intersection line with `owner`, in pixels.
    #[must_use]
    pub fn line_direction(&self, owner: PlaneId) -> Option<Vec2> {
        let [a, b] = self.pipeline(owner)?.raw_tips()?;
        Some(b - a)
    }

    /// Cursor to show while hovering or dragging `component`.
    #[must_use]
    pub fn cursor_hint(&self, component: ComponentType, owner: Option<PlaneId>) -> CursorShape {
        match component {
            ComponentType::TranslateIntersectingSlices => CursorShape::SizeAll,
            ComponentType::RotateIntersectingSlices => CursorShape::Hand,
            ComponentType::TranslateSingleIntersectingSlice | ComponentType::TranslateThickSlab => {
                owner
                    .and_then(|owner| self.line_direction(owner))
                    .map_or(CursorShape::Default, |d| {
                        CursorShape::for_direction(DVec2::new(-d.y, d.x))
                    })
            }
            ComponentType::None | ComponentType::SliceIntersection => CursorShape::Default,
        }
    }

    /// Unsubscribes from every plane and drops all pipelines.
    pub fn detach(&mut self, scene: &mut Scene) {
        if let Some(observer) = self.observer.take() {
            scene.unregister_observer(observer);
        }
        self.pipelines.clear();
        self.current = None;
        self.base.set_view_plane(None);
    }

    fn observer(&mut self, scene: &mut Scene) -> ObserverId {
        *self.observer.get_or_insert_with(|| scene.register_observer())
    }

    fn sync_needs_render(&mut self) {
        if self.pipelines.iter().any(DisplayPipeline::needs_render) {
            self.base.set_needs_render();
        }
    }
}

impl Drop for SliceIntersectionRepresentation {
    fn drop(&mut self) {
        if let Some(observer) = self.observer {
            log::warn!(
                "slice intersection representation dropped while {observer:?} is registered"
            );
        }
    }
}

fn apply_handle_state(pipeline: &mut DisplayPipeline, visible: bool, opacity: f64) {
    let (visible, opacity) = match pipeline.handles_visibility_mode() {
        HandlesVisibilityMode::AlwaysVisible => (true, 1.0),
        HandlesVisibilityMode::NeverVisible => (false, opacity),
        HandlesVisibilityMode::NearbyVisible | HandlesVisibilityMode::FadeVisible => {
            (visible, opacity)
        }
    };
    pipeline.set_handles_visibility(visible);
    pipeline.set_thick_slab_handles_visibility(visible);
    pipeline.set_handles_opacity(opacity);
}

fn contains_closed(bounds: Rect, point: Point) -> bool {
    point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
}

fn to_point(p: DVec3) -> Point {
    Point::new(p.x, p.y)
}

fn to_dvec3(p: Point) -> DVec3 {
    DVec3::new(p.x, p.y, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reslice_scene::{ActiveComponent, SliceIntersectionFlags};

    /// An axial view and two vertical planes crossing it along x = 0 and y = 0.
    fn scene_with_three_planes() -> (Scene, PlaneId, PlaneId, PlaneId) {
        let mut scene = Scene::new();
        let axial = scene.add_plane(ViewPlane::new("Red", (200, 200), 1.0));
        let sagittal = scene.add_plane(
            ViewPlane::new("Yellow", (200, 200), 1.0)
                .with_slice_to_world(DMat4::from_rotation_y(core::f64::consts::FRAC_PI_2)),
        );
        let coronal = scene.add_plane(
            ViewPlane::new("Green", (200, 200), 1.0)
                .with_slice_to_world(DMat4::from_rotation_x(core::f64::consts::FRAC_PI_2)),
        );
        for id in [axial, sagittal, coronal] {
            scene
                .update_display_settings(id, |s| s.intersection_mode = IntersectionMode::FullLines)
                .unwrap();
        }
        (scene, axial, sagittal, coronal)
    }

    fn attached(scene: &mut Scene, current: PlaneId) -> SliceIntersectionRepresentation {
        let mut rep = SliceIntersectionRepresentation::default();
        rep.set_current_plane(scene, Some(current));
        scene.take_notifications(rep.observer.unwrap());
        rep
    }

    #[test]
    fn crossing_point_is_the_view_centre() {
        let (mut scene, axial, _, _) = scene_with_three_planes();
        let mut rep = attached(&mut scene, axial);
        assert_eq!(rep.pipeline_count(), 2);
        let point = rep.slice_intersection_point();
        assert!(point.abs_diff_eq(DVec3::new(100.0, 100.0, 0.0), 1e-6), "point = {point}");
        rep.detach(&mut scene);
    }

    #[test]
    fn registration_order_does_not_move_the_crossing() {
        let (mut scene, axial, sagittal, coronal) = scene_with_three_planes();
        scene
            .update_plane(sagittal, |p| {
                p.slice_to_world = DMat4::from_translation(DVec3::new(12.0, 0.0, 0.0))
                    * DMat4::from_rotation_y(core::f64::consts::FRAC_PI_2);
            })
            .unwrap();

        let mut forward = SliceIntersectionRepresentation::default();
        forward.set_current_plane(&mut scene, Some(axial));
        assert_eq!(forward.pipelines()[0].other_plane(), sagittal);

        let mut backward = SliceIntersectionRepresentation::default();
        backward.current = Some(axial);
        backward.add_other_plane(&mut scene, coronal);
        backward.add_other_plane(&mut scene, sagittal);
        assert_eq!(backward.pipelines()[0].other_plane(), coronal);

        let a = forward.compute_intersection_point(&scene);
        let b = backward.compute_intersection_point(&scene);
        assert!(a.abs_diff_eq(b, 1e-9), "{a} != {b}");
        assert!((a.x - 112.0).abs() < 1e-6, "a = {a}");
        forward.detach(&mut scene);
        backward.detach(&mut scene);
    }

    #[test]
    fn no_crossing_falls_back_to_the_pixel_centre() {
        let mut scene = Scene::new();
        let current = scene.add_plane(ViewPlane::new("Red", (300, 100), 1.0));
        let other = scene.add_plane(
            ViewPlane::new("Yellow", (200, 200), 1.0)
                .with_slice_to_world(DMat4::from_rotation_y(core::f64::consts::FRAC_PI_2)),
        );
        let mut rep = attached(&mut scene, current);
        assert!(rep.pipeline(other).unwrap().raw_tips().is_some());
        assert_eq!(
            rep.compute_intersection_point(&scene),
            DVec3::new(150.0, 50.0, 0.0)
        );
        rep.detach(&mut scene);
    }

    #[test]
    fn other_view_groups_are_hidden() {
        let (mut scene, axial, sagittal, _) = scene_with_three_planes();
        scene.update_plane(sagittal, |p| p.view_group = 1).unwrap();
        let mut rep = attached(&mut scene, axial);
        let pipeline = rep.pipeline(sagittal).unwrap();
        assert!(!pipeline.is_visible());
        assert!(pipeline.raw_tips().is_none());
        rep.detach(&mut scene);
    }

    #[test]
    fn handle_broadcast_respects_plane_overrides() {
        let (mut scene, axial, sagittal, coronal) = scene_with_three_planes();
        scene
            .update_display_settings(sagittal, |s| {
                s.handles_visibility_mode = HandlesVisibilityMode::AlwaysVisible;
            })
            .unwrap();
        scene
            .update_display_settings(coronal, |s| {
                s.handles_visibility_mode = HandlesVisibilityMode::NeverVisible;
            })
            .unwrap();
        let mut rep = attached(&mut scene, axial);

        rep.set_handles_visibility(false);
        rep.set_handles_opacity(0.25);
        let always = rep.pipeline(sagittal).unwrap();
        assert!(always.visibility().translation_handle);
        assert_eq!(always.handles_opacity(), 1.0);

        rep.set_handles_visibility(true);
        let never = rep.pipeline(coronal).unwrap();
        assert!(!never.visibility().translation_handle);
        assert_eq!(never.visibility().rotation_handles, [false, false]);
        rep.detach(&mut scene);
    }

    #[test]
    fn handles_show_while_a_handle_is_active() {
        let (mut scene, axial, sagittal, _) = scene_with_three_planes();
        let mut rep = attached(&mut scene, axial);
        assert!(!rep.pipeline(sagittal).unwrap().visibility().translation_handle);

        let hover = ActiveComponent::new(ComponentType::TranslateIntersectingSlices, Some(0));
        scene.set_active_component(axial, hover).unwrap();
        rep.process_notifications(&mut scene);
        assert!(rep.pipeline(sagittal).unwrap().visibility().translation_handle);

        let dragging = ActiveComponent::new(ComponentType::SliceIntersection, None);
        scene.set_active_component(axial, dragging).unwrap();
        rep.process_notifications(&mut scene);
        assert!(!rep.pipeline(sagittal).unwrap().visibility().translation_handle);
        rep.detach(&mut scene);
    }

    #[test]
    fn repeated_handle_visibility_renders_once() {
        let (mut scene, axial, _, _) = scene_with_three_planes();
        let mut rep = attached(&mut scene, axial);
        rep.take_needs_render();

        rep.set_handles_visibility(true);
        assert!(rep.take_needs_render());
        rep.set_handles_visibility(true);
        assert!(!rep.take_needs_render());
        rep.detach(&mut scene);
    }

    #[test]
    fn disabled_rotation_is_never_picked() {
        let (mut scene, axial, _, _) = scene_with_three_planes();
        let mut rep = attached(&mut scene, axial);
        let outer_tip = rep.pipelines()[0].rotation_handle_points()[0];
        let event = PointerEvent::at_display(outer_tip);
        assert_eq!(
            rep.can_interact(&scene, &event).component,
            ComponentType::RotateIntersectingSlices
        );

        scene
            .update_display_settings(axial, |s| s.flags.remove(SliceIntersectionFlags::ROTATION))
            .unwrap();
        rep.process_notifications(&mut scene);
        assert_ne!(
            rep.can_interact(&scene, &event).component,
            ComponentType::RotateIntersectingSlices
        );
        rep.detach(&mut scene);
    }

    #[test]
    fn opacity_fades_outside_the_picking_radius() {
        let (mut scene, axial, _, _) = scene_with_three_planes();
        let mut rep = attached(&mut scene, axial);
        // Picking radius is 20 / 2 + 30 = 40 pixels, 1600 squared.
        let far = PointerEvent::at_display(Point::new(-1000.0, -1000.0));
        let miss = rep.can_interact(&scene, &far);
        assert!(!miss.is_hit());
        assert_eq!(miss.opacity, 0.0);

        let centre = Point::new(100.0, 100.0);
        let hit = rep.can_interact(&scene, &PointerEvent::at_display(centre));
        assert_eq!(hit.component, ComponentType::TranslateIntersectingSlices);
        assert_eq!(hit.opacity, 1.0);
        rep.detach(&mut scene);
    }

    #[test]
    fn world_only_events_compare_world_distances() {
        let (mut scene, axial, _, _) = scene_with_three_planes();
        let mut rep = attached(&mut scene, axial);
        let hit = rep.can_interact(&scene, &PointerEvent::at_world(DVec3::new(0.5, 0.5, 0.0), 1.0));
        assert_eq!(hit.component, ComponentType::TranslateIntersectingSlices);

        let nowhere = PointerEvent {
            display_position: None,
            world_position: None,
            world_to_physical_scale: 1.0,
        };
        assert!(!rep.can_interact(&scene, &nowhere).is_hit());
        rep.detach(&mut scene);
    }

    #[test]
    fn cursor_follows_the_hovered_line() {
        let (mut scene, axial, sagittal, coronal) = scene_with_three_planes();
        let mut rep = attached(&mut scene, axial);
        assert_eq!(
            rep.cursor_hint(ComponentType::TranslateIntersectingSlices, None),
            CursorShape::SizeAll
        );
        assert_eq!(
            rep.cursor_hint(ComponentType::RotateIntersectingSlices, Some(sagittal)),
            CursorShape::Hand
        );
        // The sagittal line is vertical; moving it is a horizontal drag.
        assert_eq!(
            rep.cursor_hint(ComponentType::TranslateSingleIntersectingSlice, Some(sagittal)),
            CursorShape::SizeWE
        );
        assert_eq!(
            rep.cursor_hint(ComponentType::TranslateSingleIntersectingSlice, Some(coronal)),
            CursorShape::SizeNS
        );
        rep.detach(&mut scene);
    }

    #[test]
    fn cursor_must_be_strictly_inside_the_view() {
        let (mut scene, axial, _, _) = scene_with_three_planes();
        let mut rep = attached(&mut scene, axial);
        assert!(rep.is_cursor_in_view(&scene, Point::new(1.0, 1.0)));
        assert!(!rep.is_cursor_in_view(&scene, Point::new(-0.5, 50.0)));
        assert!(!rep.is_cursor_in_view(&scene, Point::new(200.5, 50.0)));
        rep.detach(&mut scene);
    }

    #[test]
    fn detach_unsubscribes_everything() {
        let (mut scene, axial, sagittal, coronal) = scene_with_three_planes();
        let mut rep = attached(&mut scene, axial);
        assert_eq!(scene.subscriber_count(axial), 1);
        rep.detach(&mut scene);
        for id in [axial, sagittal, coronal] {
            assert_eq!(scene.subscriber_count(id), 0);
        }
        assert_eq!(rep.pipeline_count(), 0);
    }
}
