// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=reslice_intersection --heading-base-level=0

//! Reslice Intersection: where the other view planes cross the current one.
//!
//! Each view of a volume shows a single plane. This crate draws, inside one
//! such view, the lines along which every other plane of the same view group
//! cuts it, and offers handles on those lines:
//! - a disc at the common crossing point moves every plane at once,
//! - arc arrows near the line ends rotate every plane about the crossing,
//! - double arrows halfway along a line move just that plane,
//! - double arrows on thick-slab boundaries resize the slab.
//!
//! [`SliceIntersectionRepresentation`] keeps one [`DisplayPipeline`] per other
//! plane in sync with a [`Scene`](reslice_scene::Scene), computes the shared
//! crossing point, hit tests pointer positions against every handle and
//! applies transforms to the intersecting planes. Geometry is produced in the
//! current view's pixel space; drawing it is left to the host.
//!
//! ## Minimal example
//!
//! ```rust
//! use glam::DMat4;
//! use kurbo::Point;
//! use reslice_intersection::{PointerEvent, SliceIntersectionRepresentation};
//! use reslice_scene::{ComponentType, IntersectionMode, Scene, ViewPlane};
//!
//! let mut scene = Scene::new();
//! let red = scene.add_plane(ViewPlane::new("Red", (200, 200), 1.0));
//! let yellow = scene.add_plane(
//!     ViewPlane::new("Yellow", (200, 200), 1.0)
//!         .with_slice_to_world(DMat4::from_rotation_y(core::f64::consts::FRAC_PI_2)),
//! );
//! let green = scene.add_plane(
//!     ViewPlane::new("Green", (200, 200), 1.0)
//!         .with_slice_to_world(DMat4::from_rotation_x(core::f64::consts::FRAC_PI_2)),
//! );
//! for id in [yellow, green] {
//!     scene
//!         .update_display_settings(id, |s| s.intersection_mode = IntersectionMode::FullLines)
//!         .unwrap();
//! }
//!
//! let mut representation = SliceIntersectionRepresentation::default();
//! representation.set_current_plane(&mut scene, Some(red));
//! assert_eq!(representation.pipeline_count(), 2);
//!
//! // The yellow and green lines cross in the middle of the red view.
//! let centre = Point::new(100.0, 100.0);
//! let hit = representation.can_interact(&scene, &PointerEvent::at_display(centre));
//! assert_eq!(hit.component, ComponentType::TranslateIntersectingSlices);
//!
//! representation.detach(&mut scene);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
pub mod glyph;
mod handle;
mod pipeline;
mod representation;

pub use config::IntersectionConfig;
pub use handle::{HandleInfo, InteractionHit, PointerEvent};
pub use pipeline::{DisplayPipeline, LineLayout, PipelineVisibility};
pub use representation::SliceIntersectionRepresentation;
