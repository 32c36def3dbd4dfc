// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=reslice_scene --heading-base-level=0

//! Reslice Scene: view planes and the registry that watches them.
//!
//! A [`ViewPlane`] is a 2D cut through a 3D volume as shown in one view: a
//! pose (`slice_to_world`), a field of view in world units and a size in
//! pixels. Every plane carries [`DisplaySettings`] describing how the lines
//! of *other* planes are drawn in its view and which handles may be used.
//!
//! The [`Scene`] owns the planes. Everything that changes a plane goes through
//! it, and observers subscribed to a plane are told about each change. A
//! [`start_modify`](Scene::start_modify) / [`end_modify`](Scene::end_modify)
//! bracket turns a burst of changes into a single notification.
//!
//! ## Minimal example
//!
//! ```rust
//! use glam::DVec3;
//! use reslice_scene::{Scene, ViewPlane};
//!
//! let mut scene = Scene::new();
//! let red = scene.add_plane(ViewPlane::new("Red", (256, 256), 1.0));
//! let watcher = scene.register_observer();
//! scene.subscribe(watcher, red).unwrap();
//!
//! scene.start_modify(red).unwrap();
//! scene.jump_slice(red, DVec3::new(0.0, 0.0, 4.0)).unwrap();
//! scene.jump_slice(red, DVec3::new(0.0, 0.0, 5.0)).unwrap();
//! scene.end_modify(red).unwrap();
//!
//! assert_eq!(scene.take_notifications(watcher), [red]);
//! assert_eq!(scene.plane(red).unwrap().origin().z, 5.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod plane;
mod scene;
mod settings;

pub use error::SceneError;
pub use plane::{JumpMode, SlabReconstruction, ViewPlane};
pub use scene::{ObserverId, PlaneId, Scene};
pub use settings::{
    ActiveComponent, ComponentType, DisplaySettings, HandlesVisibilityMode, IntersectionMode,
    LineThicknessMode, SliceIntersectionFlags,
};
