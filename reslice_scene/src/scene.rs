// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plane registry with change notification.

use alloc::vec::Vec;
use core::mem;

use glam::{DMat4, DVec3};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::{ActiveComponent, DisplaySettings, SceneError, ViewPlane};

/// Identifier of a view plane in a [`Scene`].
///
/// Identifiers are allocated in increasing order and never reused, so the
/// derived ordering is the insertion order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlaneId(u32);

impl PlaneId {
    /// Returns the raw index of this identifier.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Identifier of a change-notification observer registered with a [`Scene`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

#[derive(Debug)]
struct PlaneEntry {
    plane: ViewPlane,
    display: DisplaySettings,
    subscribers: SmallVec<[ObserverId; 4]>,
    modify_depth: u32,
    modified: bool,
}

/// The set of view planes shown by an application, and who watches them.
///
/// Mutations go through the scene so that every subscriber of a plane hears
/// about the change. Notifications are queued per observer and collected
/// with [`Scene::take_notifications`]; they carry only the plane id and the
/// receiver re-reads the current state.
///
/// Wrapping several mutations in [`Scene::start_modify`] /
/// [`Scene::end_modify`] collapses them into one notification per plane,
/// sent when the outermost bracket closes.
#[derive(Debug, Default)]
pub struct Scene {
    planes: HashMap<PlaneId, PlaneEntry>,
    order: Vec<PlaneId>,
    observers: HashMap<ObserverId, Vec<PlaneId>>,
    next_plane: u32,
    next_observer: u32,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plane with default display settings.
    pub fn add_plane(&mut self, plane: ViewPlane) -> PlaneId {
        self.add_plane_with_settings(plane, DisplaySettings::default())
    }

    /// Adds a plane with the given display settings.
    pub fn add_plane_with_settings(
        &mut self,
        plane: ViewPlane,
        display: DisplaySettings,
    ) -> PlaneId {
        let id = PlaneId(self.next_plane);
        self.next_plane += 1;
        self.planes.insert(
            id,
            PlaneEntry {
                plane,
                display,
                subscribers: SmallVec::new(),
                modify_depth: 0,
                modified: false,
            },
        );
        self.order.push(id);
        id
    }

    /// Removes a plane.
    ///
    /// Subscribers receive one last notification for it; when they look the
    /// plane up it is gone.
    pub fn remove_plane(&mut self, id: PlaneId) -> Result<ViewPlane, SceneError> {
        let entry = self.planes.remove(&id).ok_or(SceneError::UnknownPlane(id))?;
        self.order.retain(|p| *p != id);
        for observer in &entry.subscribers {
            if let Some(queue) = self.observers.get_mut(observer) {
                queue.push(id);
            }
        }
        Ok(entry.plane)
    }

    /// Returns the number of planes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the scene has no planes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if `id` refers to a plane in the scene.
    #[must_use]
    pub fn contains(&self, id: PlaneId) -> bool {
        self.planes.contains_key(&id)
    }

    /// Iterates plane ids in insertion order.
    pub fn plane_ids(&self) -> impl Iterator<Item = PlaneId> + '_ {
        self.order.iter().copied()
    }

    /// Returns a plane.
    #[must_use]
    pub fn plane(&self, id: PlaneId) -> Option<&ViewPlane> {
        self.planes.get(&id).map(|e| &e.plane)
    }

    /// Returns a plane's display settings.
    #[must_use]
    pub fn display_settings(&self, id: PlaneId) -> Option<&DisplaySettings> {
        self.planes.get(&id).map(|e| &e.display)
    }

    /// Registers a new observer with an empty notification queue.
    pub fn register_observer(&mut self) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.insert(id, Vec::new());
        id
    }

    /// Unregisters an observer and drops all of its subscriptions.
    pub fn unregister_observer(&mut self, observer: ObserverId) {
        self.unsubscribe_all(observer);
        self.observers.remove(&observer);
    }

    /// Subscribes `observer` to changes of `plane`. Subscribing twice is a no-op.
    pub fn subscribe(&mut self, observer: ObserverId, plane: PlaneId) -> Result<(), SceneError> {
        if !self.observers.contains_key(&observer) {
            return Err(SceneError::UnknownObserver(observer));
        }
        let entry = self
            .planes
            .get_mut(&plane)
            .ok_or(SceneError::UnknownPlane(plane))?;
        if !entry.subscribers.contains(&observer) {
            entry.subscribers.push(observer);
        }
        Ok(())
    }

    /// Unsubscribes `observer` from `plane`, returning whether it was subscribed.
    pub fn unsubscribe(&mut self, observer: ObserverId, plane: PlaneId) -> bool {
        let Some(entry) = self.planes.get_mut(&plane) else {
            return false;
        };
        let before = entry.subscribers.len();
        entry.subscribers.retain(|o| *o != observer);
        entry.subscribers.len() != before
    }

    /// Unsubscribes `observer` from every plane.
    pub fn unsubscribe_all(&mut self, observer: ObserverId) {
        for entry in self.planes.values_mut() {
            entry.subscribers.retain(|o| *o != observer);
        }
    }

    /// Returns `true` if `observer` is subscribed to `plane`.
    #[must_use]
    pub fn is_subscribed(&self, observer: ObserverId, plane: PlaneId) -> bool {
        self.planes
            .get(&plane)
            .is_some_and(|e| e.subscribers.contains(&observer))
    }

    /// Returns the number of subscribers of `plane`.
    #[must_use]
    pub fn subscriber_count(&self, plane: PlaneId) -> usize {
        self.planes.get(&plane).map_or(0, |e| e.subscribers.len())
    }

    /// Takes the queued notifications of `observer`, oldest first.
    pub fn take_notifications(&mut self, observer: ObserverId) -> Vec<PlaneId> {
        self.observers
            .get_mut(&observer)
            .map(mem::take)
            .unwrap_or_default()
    }

    /// Opens a modification bracket on a plane.
    ///
    /// Returns `true` if the plane was already inside a bracket.
    pub fn start_modify(&mut self, id: PlaneId) -> Result<bool, SceneError> {
        let entry = self.planes.get_mut(&id).ok_or(SceneError::UnknownPlane(id))?;
        let nested = entry.modify_depth > 0;
        entry.modify_depth += 1;
        Ok(nested)
    }

    /// Closes a modification bracket on a plane.
    ///
    /// When the outermost bracket closes and the plane changed inside it, its
    /// subscribers are notified once.
    pub fn end_modify(&mut self, id: PlaneId) -> Result<(), SceneError> {
        let entry = self.planes.get_mut(&id).ok_or(SceneError::UnknownPlane(id))?;
        if entry.modify_depth == 0 {
            log::warn!("end_modify on {id:?} without start_modify");
            return Err(SceneError::UnbalancedModify(id));
        }
        entry.modify_depth -= 1;
        if entry.modify_depth == 0 && mem::take(&mut entry.modified) {
            self.notify(id);
        }
        Ok(())
    }

    /// Replaces the pose of a plane.
    pub fn set_slice_to_world(
        &mut self,
        id: PlaneId,
        slice_to_world: DMat4,
    ) -> Result<(), SceneError> {
        self.update_plane(id, |plane| plane.slice_to_world = slice_to_world)
    }

    /// Mutates a plane and notifies its subscribers.
    pub fn update_plane(
        &mut self,
        id: PlaneId,
        f: impl FnOnce(&mut ViewPlane),
    ) -> Result<(), SceneError> {
        let entry = self.planes.get_mut(&id).ok_or(SceneError::UnknownPlane(id))?;
        f(&mut entry.plane);
        self.modified(id);
        Ok(())
    }

    /// Mutates a plane's display settings and notifies its subscribers.
    pub fn update_display_settings(
        &mut self,
        id: PlaneId,
        f: impl FnOnce(&mut DisplaySettings),
    ) -> Result<(), SceneError> {
        let entry = self.planes.get_mut(&id).ok_or(SceneError::UnknownPlane(id))?;
        f(&mut entry.display);
        self.modified(id);
        Ok(())
    }

    /// Sets the component under interaction in a plane's view.
    ///
    /// Subscribers are only notified when the value changes.
    pub fn set_active_component(
        &mut self,
        id: PlaneId,
        active: ActiveComponent,
    ) -> Result<(), SceneError> {
        let entry = self.planes.get_mut(&id).ok_or(SceneError::UnknownPlane(id))?;
        if entry.display.active_component == active {
            return Ok(());
        }
        entry.display.active_component = active;
        self.modified(id);
        Ok(())
    }

    /// Moves one plane so that it passes through `point` (world coordinates).
    pub fn jump_slice(&mut self, id: PlaneId, point: DVec3) -> Result<(), SceneError> {
        self.update_plane(id, |plane| plane.jump_to(point))
    }

    /// Moves every other plane in the view group of `from` through `point`.
    pub fn jump_all_slices(&mut self, from: PlaneId, point: DVec3) -> Result<(), SceneError> {
        let group = self
            .plane(from)
            .ok_or(SceneError::UnknownPlane(from))?
            .view_group;
        let targets: SmallVec<[PlaneId; 8]> = self
            .order
            .iter()
            .copied()
            .filter(|id| *id != from && self.plane(*id).is_some_and(|p| p.view_group == group))
            .collect();
        for id in targets {
            self.jump_slice(id, point)?;
        }
        Ok(())
    }

    fn modified(&mut self, id: PlaneId) {
        let Some(entry) = self.planes.get_mut(&id) else {
            return;
        };
        if entry.modify_depth > 0 {
            entry.modified = true;
        } else {
            self.notify(id);
        }
    }

    fn notify(&mut self, id: PlaneId) {
        let Some(entry) = self.planes.get(&id) else {
            return;
        };
        log::trace!("plane {id:?} modified, notifying {} observers", entry.subscribers.len());
        for observer in &entry.subscribers {
            if let Some(queue) = self.observers.get_mut(observer) {
                queue.push(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_planes(n: usize) -> (Scene, Vec<PlaneId>) {
        let mut scene = Scene::new();
        let ids = (0..n)
            .map(|i| scene.add_plane(ViewPlane::new(alloc::format!("P{i}"), (100, 100), 1.0)))
            .collect();
        (scene, ids)
    }

    #[test]
    fn planes_keep_insertion_order() {
        let (mut scene, ids) = scene_with_planes(3);
        assert_eq!(scene.plane_ids().collect::<Vec<_>>(), ids);
        scene.remove_plane(ids[1]).unwrap();
        assert_eq!(scene.plane_ids().collect::<Vec<_>>(), [ids[0], ids[2]]);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn subscribers_hear_about_changes() {
        let (mut scene, ids) = scene_with_planes(2);
        let observer = scene.register_observer();
        scene.subscribe(observer, ids[0]).unwrap();
        scene.subscribe(observer, ids[0]).unwrap();
        assert_eq!(scene.subscriber_count(ids[0]), 1);

        scene.set_slice_to_world(ids[0], DMat4::from_rotation_x(0.1)).unwrap();
        scene.set_slice_to_world(ids[1], DMat4::from_rotation_x(0.1)).unwrap();
        assert_eq!(scene.take_notifications(observer), [ids[0]]);
        assert!(scene.take_notifications(observer).is_empty());
    }

    #[test]
    fn modify_bracket_coalesces_notifications() {
        let (mut scene, ids) = scene_with_planes(1);
        let observer = scene.register_observer();
        scene.subscribe(observer, ids[0]).unwrap();

        assert!(!scene.start_modify(ids[0]).unwrap());
        assert!(scene.start_modify(ids[0]).unwrap());
        scene.jump_slice(ids[0], DVec3::new(0.0, 0.0, 1.0)).unwrap();
        scene.jump_slice(ids[0], DVec3::new(0.0, 0.0, 2.0)).unwrap();
        scene.end_modify(ids[0]).unwrap();
        assert!(scene.take_notifications(observer).is_empty());
        scene.end_modify(ids[0]).unwrap();
        assert_eq!(scene.take_notifications(observer), [ids[0]]);

        assert_eq!(scene.end_modify(ids[0]), Err(SceneError::UnbalancedModify(ids[0])));
    }

    #[test]
    fn untouched_bracket_is_silent() {
        let (mut scene, ids) = scene_with_planes(1);
        let observer = scene.register_observer();
        scene.subscribe(observer, ids[0]).unwrap();
        scene.start_modify(ids[0]).unwrap();
        scene.end_modify(ids[0]).unwrap();
        assert!(scene.take_notifications(observer).is_empty());
    }

    #[test]
    fn unchanged_active_component_is_silent() {
        let (mut scene, ids) = scene_with_planes(1);
        let observer = scene.register_observer();
        scene.subscribe(observer, ids[0]).unwrap();
        scene.set_active_component(ids[0], ActiveComponent::NONE).unwrap();
        assert!(scene.take_notifications(observer).is_empty());
    }

    #[test]
    fn unknown_ids_are_errors() {
        let (mut scene, ids) = scene_with_planes(1);
        let observer = scene.register_observer();
        scene.remove_plane(ids[0]).unwrap();
        assert_eq!(scene.subscribe(observer, ids[0]), Err(SceneError::UnknownPlane(ids[0])));
        assert_eq!(
            scene.jump_slice(ids[0], DVec3::ZERO),
            Err(SceneError::UnknownPlane(ids[0]))
        );
        scene.unregister_observer(observer);
        let (mut other, other_ids) = scene_with_planes(1);
        assert!(other.subscribe(observer, other_ids[0]).is_err());
    }
}
