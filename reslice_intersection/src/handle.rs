// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::DVec3;
use kurbo::Point;
use reslice_scene::{ComponentType, PlaneId};

/// One pickable point of a handle, produced fresh for each hit test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleInfo {
    /// Index of the point within its handle kind in the owning pipeline.
    pub index: usize,
    /// Kind of handle.
    pub component: ComponentType,
    /// The other plane whose intersection carries this handle.
    pub owner: PlaneId,
    /// Position in world coordinates.
    pub position_world: DVec3,
    /// Position in the current view's pixel space.
    pub position_local: Point,
}

/// A pointer position to hit test.
///
/// Desktop input provides a display position. Immersive input may only have a
/// world position, in which case distances are compared in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in the current view's pixel space.
    pub display_position: Option<Point>,
    /// Pointer position in world coordinates.
    pub world_position: Option<DVec3>,
    /// Physical size of one world unit, used to scale the picking tolerance
    /// in world-only hit tests.
    pub world_to_physical_scale: f64,
}

impl PointerEvent {
    /// A pointer event at a display position.
    #[must_use]
    pub fn at_display(position: Point) -> Self {
        Self {
            display_position: Some(position),
            world_position: None,
            world_to_physical_scale: 1.0,
        }
    }

    /// A pointer event that only has a world position.
    #[must_use]
    pub fn at_world(position: DVec3, world_to_physical_scale: f64) -> Self {
        Self {
            display_position: None,
            world_position: Some(position),
            world_to_physical_scale,
        }
    }
}

/// Result of a hit test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionHit {
    /// Picked component, [`ComponentType::None`] if nothing was picked.
    pub component: ComponentType,
    /// Index of the picked point within its handle kind.
    pub index: Option<usize>,
    /// Squared distance from the pointer to the picked point.
    pub distance2: f64,
    /// Suggested handle opacity: one within picking range, fading to zero
    /// further out.
    pub opacity: f64,
    /// Plane owning the picked handle.
    pub owner: Option<PlaneId>,
}

impl InteractionHit {
    /// Nothing picked.
    pub const MISS: Self = Self {
        component: ComponentType::None,
        index: None,
        distance2: f64::MAX,
        opacity: 0.0,
        owner: None,
    };

    /// Returns `true` if a handle was picked.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.component != ComponentType::None
    }

    /// Squared pixel distances closer than this count as a tie.
    const TIE_EPSILON: f64 = 1e-9;

    /// Whether `info` at `distance2` should replace the current pick.
    ///
    /// Closer wins. On a tie the shared translation disc beats a single-plane
    /// translation handle; otherwise the earlier pick is kept.
    pub(crate) fn prefers(&self, distance2: f64, component: ComponentType) -> bool {
        if !self.is_hit() {
            return true;
        }
        if (distance2 - self.distance2).abs() <= Self::TIE_EPSILON {
            return component == ComponentType::TranslateIntersectingSlices
                && self.component == ComponentType::TranslateSingleIntersectingSlice;
        }
        distance2 < self.distance2
    }

    pub(crate) fn pick(&mut self, info: &HandleInfo, distance2: f64) {
        self.component = info.component;
        self.index = Some(info.index);
        self.distance2 = distance2;
        self.owner = Some(info.owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(component: ComponentType, owner: PlaneId) -> HandleInfo {
        HandleInfo {
            index: 0,
            component,
            owner,
            position_world: DVec3::ZERO,
            position_local: Point::ORIGIN,
        }
    }

    #[test]
    fn translate_all_wins_ties() {
        let mut scene = reslice_scene::Scene::new();
        let owner = scene.add_plane(reslice_scene::ViewPlane::new("Other", (10, 10), 1.0));

        let mut hit = InteractionHit::MISS;
        assert!(hit.prefers(25.0, ComponentType::TranslateSingleIntersectingSlice));
        hit.pick(&info(ComponentType::TranslateSingleIntersectingSlice, owner), 25.0);

        assert!(hit.prefers(25.0, ComponentType::TranslateIntersectingSlices));
        assert!(!hit.prefers(25.0, ComponentType::RotateIntersectingSlices));
        assert!(!hit.prefers(26.0, ComponentType::TranslateIntersectingSlices));
        assert!(hit.prefers(24.0, ComponentType::RotateIntersectingSlices));

        hit.pick(&info(ComponentType::TranslateIntersectingSlices, owner), 25.0);
        assert!(!hit.prefers(25.0, ComponentType::TranslateSingleIntersectingSlice));
    }
}
