// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DMat3, DVec3};
use kurbo::Point;
use reslice_geometry::rotation_about_axis;
use reslice_intersection::{InteractionHit, PointerEvent, SliceIntersectionRepresentation};
use reslice_scene::{
    ActiveComponent, ComponentType, HandlesVisibilityMode, PlaneId, Scene, ViewPlane,
};
use reslice_view::CursorShape;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::DragState;

/// Distance claimed for events the widget could handle without being over a
/// handle, so that widgets closer to the pointer win.
pub const FALLBACK_DISTANCE2: f64 = 1e10;

/// Where the widget is in its hover and drag cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WidgetState {
    /// Not over any handle.
    #[default]
    Idle,
    /// Over a rotation handle.
    OnRotate,
    /// Over the shared translation disc.
    OnTranslateAll,
    /// Over a single-plane translation handle.
    OnTranslateSingle,
    /// Over a thick-slab handle.
    OnThickSlab,
    /// Rotating every intersecting plane.
    Rotate,
    /// Moving every intersecting plane.
    TranslateAll,
    /// Moving one intersecting plane.
    TranslateSingle,
    /// Resizing a slab.
    ThickSlab,
}

impl WidgetState {
    /// Returns `true` for the drag states.
    #[must_use]
    pub const fn is_dragging(self) -> bool {
        matches!(
            self,
            Self::Rotate | Self::TranslateAll | Self::TranslateSingle | Self::ThickSlab
        )
    }

    /// The handle kind this state hovers or drags.
    #[must_use]
    pub const fn component(self) -> ComponentType {
        match self {
            Self::Idle => ComponentType::None,
            Self::OnRotate | Self::Rotate => ComponentType::RotateIntersectingSlices,
            Self::OnTranslateAll | Self::TranslateAll => ComponentType::TranslateIntersectingSlices,
            Self::OnTranslateSingle | Self::TranslateSingle => {
                ComponentType::TranslateSingleIntersectingSlice
            }
            Self::OnThickSlab | Self::ThickSlab => ComponentType::TranslateThickSlab,
        }
    }

    fn hovering(component: ComponentType) -> Self {
        match component {
            ComponentType::RotateIntersectingSlices => Self::OnRotate,
            ComponentType::TranslateIntersectingSlices => Self::OnTranslateAll,
            ComponentType::TranslateSingleIntersectingSlice => Self::OnTranslateSingle,
            ComponentType::TranslateThickSlab => Self::OnThickSlab,
            ComponentType::None | ComponentType::SliceIntersection => Self::Idle,
        }
    }

    fn dragging(self) -> Option<Self> {
        match self {
            Self::OnRotate => Some(Self::Rotate),
            Self::OnTranslateAll => Some(Self::TranslateAll),
            Self::OnTranslateSingle => Some(Self::TranslateSingle),
            Self::OnThickSlab => Some(Self::ThickSlab),
            _ => None,
        }
    }
}

/// Pointer input delivered to the widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionEvent {
    /// The pointer moved.
    PointerMove(PointerEvent),
    /// The primary button went down.
    ButtonPress(PointerEvent),
    /// The primary button went up.
    ButtonRelease(PointerEvent),
    /// The pointer left the view.
    Leave,
}

/// Drives a [`SliceIntersectionRepresentation`] from pointer input.
///
/// Hovering highlights the handle under the pointer by setting the current
/// plane's active component. Pressing on a handle starts a drag that moves,
/// rotates or resizes the intersecting planes through the [`Scene`].
#[derive(Debug, Default)]
pub struct SliceIntersectionWidget {
    representation: SliceIntersectionRepresentation,
    state: WidgetState,
    drag: DragState,
    owner: Option<PlaneId>,
    start_world: DVec3,
    rotation_center_xy: DVec3,
    rotation_center: DVec3,
    previous_angle: f64,
}

impl SliceIntersectionWidget {
    /// Wraps a representation.
    #[must_use]
    pub fn new(representation: SliceIntersectionRepresentation) -> Self {
        Self {
            representation,
            ..Self::default()
        }
    }

    /// The driven representation.
    #[must_use]
    pub fn representation(&self) -> &SliceIntersectionRepresentation {
        &self.representation
    }

    /// The driven representation, mutably.
    pub fn representation_mut(&mut self) -> &mut SliceIntersectionRepresentation {
        &mut self.representation
    }

    /// Current hover or drag state.
    #[must_use]
    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// Plane owning the hovered or dragged handle.
    #[must_use]
    pub fn owner(&self) -> Option<PlaneId> {
        self.owner
    }

    /// Selects the view the widget works in.
    pub fn set_current_plane(&mut self, scene: &mut Scene, plane: Option<PlaneId>) {
        self.cancel();
        self.representation.set_current_plane(scene, plane);
    }

    /// Unsubscribes the representation from the scene.
    pub fn detach(&mut self, scene: &mut Scene) {
        self.cancel();
        self.representation.detach(scene);
    }

    /// Squared distance at which the widget claims `event`, if it wants it at all.
    ///
    /// A drag in progress claims every event at distance zero. Over a handle
    /// the distance to that handle is claimed; elsewhere a large distance is
    /// returned so that more specific widgets get the event first.
    #[must_use]
    pub fn can_process_event(&self, scene: &Scene, event: &InteractionEvent) -> Option<f64> {
        let current = self.representation.current_plane()?;
        match event {
            InteractionEvent::Leave => scene
                .display_settings(current)
                .is_some_and(|s| s.has_active_component())
                .then_some(0.0),
            _ if self.state.is_dragging() => Some(0.0),
            InteractionEvent::ButtonRelease(_) => None,
            InteractionEvent::PointerMove(pointer) | InteractionEvent::ButtonPress(pointer) => {
                let hit = self.representation.can_interact(scene, pointer);
                Some(if hit.is_hit() { hit.distance2 } else { FALLBACK_DISTANCE2 })
            }
        }
    }

    /// Handles `event`, returning whether it was consumed.
    ///
    /// Scene changes made while handling the event are fed back to the
    /// representation before returning.
    pub fn process_event(&mut self, scene: &mut Scene, event: &InteractionEvent) -> bool {
        let processed = match event {
            InteractionEvent::PointerMove(pointer) => {
                if self.state.is_dragging() {
                    self.drag_to(scene, pointer);
                } else {
                    self.hover(scene, pointer);
                }
                true
            }
            InteractionEvent::ButtonPress(pointer) => self.press(scene, pointer),
            InteractionEvent::ButtonRelease(_) => self.release(scene),
            InteractionEvent::Leave => {
                self.leave(scene);
                true
            }
        };
        self.representation.process_notifications(scene);
        processed
    }

    /// Cursor for the current state.
    #[must_use]
    pub fn cursor(&self) -> CursorShape {
        self.representation.cursor_hint(self.state.component(), self.owner)
    }

    fn hover(&mut self, scene: &mut Scene, pointer: &PointerEvent) {
        let Some(current) = self.representation.current_plane() else {
            return;
        };
        let hit = self.representation.can_interact(scene, pointer);
        self.state = WidgetState::hovering(hit.component);
        if hit.is_hit() {
            self.owner = hit.owner;
        }
        set_active(scene, current, ActiveComponent::new(hit.component, hit.index));
        // Visibility follows the active component, so settle it before fading.
        self.representation.process_notifications(scene);
        self.fade_handles(scene, current, &hit);
    }

    fn fade_handles(&mut self, scene: &Scene, current: PlaneId, hit: &InteractionHit) {
        let mode = scene
            .display_settings(current)
            .map_or(HandlesVisibilityMode::default(), |s| s.handles_visibility_mode);
        match mode {
            HandlesVisibilityMode::FadeVisible => {
                self.representation.set_handles_visibility(hit.opacity > 0.0);
                self.representation.set_handles_opacity(hit.opacity);
            }
            HandlesVisibilityMode::NearbyVisible => {
                self.representation
                    .set_handles_opacity(if hit.is_hit() { 1.0 } else { 0.0 });
            }
            HandlesVisibilityMode::AlwaysVisible => self.representation.set_handles_opacity(1.0),
            HandlesVisibilityMode::NeverVisible => self.representation.set_handles_opacity(0.0),
        }
    }

    fn press(&mut self, scene: &mut Scene, pointer: &PointerEvent) -> bool {
        self.hover(scene, pointer);
        let Some(dragging) = self.state.dragging() else {
            return false;
        };
        let (Some(position), Some(plane)) = (
            pointer.display_position,
            self.representation.current_plane().and_then(|id| scene.plane(id)),
        ) else {
            return false;
        };

        self.start_world = world_position(plane, pointer).unwrap_or(DVec3::ZERO);
        if dragging == WidgetState::Rotate {
            let center = self.representation.slice_intersection_point();
            self.rotation_center_xy = center;
            self.rotation_center = plane.xy_to_world().transform_point3(center);
            self.previous_angle = angle_about(center, position);
        }
        self.drag.start(position);
        self.state = dragging;
        log::debug!("started {dragging:?} drag at {position:?}");
        true
    }

    fn drag_to(&mut self, scene: &mut Scene, pointer: &PointerEvent) {
        let Some(current) = self.representation.current_plane() else {
            return;
        };
        if let Some(position) = pointer.display_position {
            self.drag.update(position);
        }
        // Handles hide while a drag is in progress.
        set_active(
            scene,
            current,
            ActiveComponent::new(ComponentType::SliceIntersection, Some(0)),
        );
        let Some(plane) = scene.plane(current) else {
            return;
        };
        let in_view = pointer
            .display_position
            .is_some_and(|p| self.representation.is_cursor_in_view(scene, p));
        let world = world_position(plane, pointer);

        match self.state {
            WidgetState::Rotate => {
                let Some(position) = pointer.display_position else {
                    return;
                };
                let angle = angle_about(self.rotation_center_xy, position);
                let slice_to_world = plane.slice_to_world;
                let direction = if DMat3::from_mat4(slice_to_world).determinant() >= 0.0 {
                    1.0
                } else {
                    -1.0
                };
                let delta = rotation_about_axis(
                    self.rotation_center,
                    slice_to_world.z_axis.truncate(),
                    direction * (angle - self.previous_angle),
                );
                self.previous_angle = angle;
                self.representation.transform_intersecting_slices(scene, delta);
            }
            WidgetState::TranslateAll => {
                if let (true, Some(world)) = (in_view, world) {
                    if let Err(err) = scene.jump_all_slices(current, world) {
                        log::warn!("cannot move intersecting planes: {err}");
                    }
                }
            }
            WidgetState::TranslateSingle => {
                let (true, Some(world), Some(owner)) = (in_view, world, self.owner) else {
                    return;
                };
                if world == self.start_world {
                    return;
                }
                if let Err(err) = scene.jump_slice(owner, world) {
                    log::warn!("cannot move {owner:?}: {err}");
                }
            }
            WidgetState::ThickSlab => {
                let (Some(world), Some(owner)) = (world, self.owner) else {
                    return;
                };
                let result = scene.update_plane(owner, |other| {
                    let distance = other.normal().dot(world - other.origin()).abs();
                    other.slab.thickness = 2.0 * distance;
                });
                if let Err(err) = result {
                    log::warn!("cannot resize the slab of {owner:?}: {err}");
                }
            }
            _ => {}
        }
    }

    fn release(&mut self, scene: &mut Scene) -> bool {
        if !self.state.is_dragging() {
            return false;
        }
        let moved = self.drag.end();
        log::debug!("ended {:?} drag, moved: {moved}", self.state);
        self.state = WidgetState::Idle;
        if let Some(current) = self.representation.current_plane() {
            set_active(scene, current, ActiveComponent::NONE);
        }
        // A press and release in place is left to others as a click.
        moved
    }

    fn leave(&mut self, scene: &mut Scene) {
        if !self.state.is_dragging() {
            self.state = WidgetState::Idle;
        }
        if let Some(current) = self.representation.current_plane() {
            set_active(scene, current, ActiveComponent::NONE);
        }
    }

    fn cancel(&mut self) {
        self.drag.end();
        self.state = WidgetState::Idle;
        self.owner = None;
    }
}

fn set_active(scene: &mut Scene, current: PlaneId, active: ActiveComponent) {
    if let Err(err) = scene.set_active_component(current, active) {
        log::warn!("cannot update the active component: {err}");
    }
}

/// Angle of `position` around `center`, both in the view's pixel space.
fn angle_about(center: DVec3, position: Point) -> f64 {
    (position.y - center.y).atan2(position.x - center.x)
}

/// World position of the pointer, unprojected from the view when the event
/// only carries a display position.
fn world_position(plane: &ViewPlane, pointer: &PointerEvent) -> Option<DVec3> {
    pointer.world_position.or_else(|| {
        pointer
            .display_position
            .map(|p| plane.xy_to_world().transform_point3(DVec3::new(p.x, p.y, 0.0)))
    })
}
