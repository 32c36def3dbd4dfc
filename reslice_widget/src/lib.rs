// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=reslice_widget --heading-base-level=0

//! Reslice Widget: pointer interaction for slice intersections.
//!
//! [`SliceIntersectionWidget`] turns pointer events into edits of a
//! [`Scene`](reslice_scene::Scene), using a
//! [`SliceIntersectionRepresentation`](reslice_intersection::SliceIntersectionRepresentation)
//! for hit testing:
//! - hovering a handle makes it the current view's active component and
//!   updates the cursor,
//! - dragging the shared disc moves every intersecting plane,
//! - dragging a rotation arrow rotates them about the crossing point,
//! - dragging a line's double arrow moves just that plane,
//! - dragging a thick-slab arrow resizes the slab.
//!
//! Several widgets can share one view. [`SliceIntersectionWidget::can_process_event`]
//! reports how close the pointer is to something the widget can handle, so
//! the host can route each event to the nearest claimant.
//!
//! ## Minimal example
//!
//! ```rust
//! use glam::DMat4;
//! use kurbo::Point;
//! use reslice_intersection::PointerEvent;
//! use reslice_scene::{IntersectionMode, Scene, ViewPlane};
//! use reslice_view::CursorShape;
//! use reslice_widget::{InteractionEvent, SliceIntersectionWidget, WidgetState};
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
//! let mut widget = SliceIntersectionWidget::default();
//! widget.set_current_plane(&mut scene, Some(red));
//!
//! let centre = PointerEvent::at_display(Point::new(100.0, 100.0));
//! widget.process_event(&mut scene, &InteractionEvent::PointerMove(centre));
//! assert_eq!(widget.state(), WidgetState::OnTranslateAll);
//! assert_eq!(widget.cursor(), CursorShape::SizeAll);
//!
//! widget.detach(&mut scene);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod drag;
mod widget;

pub use drag::DragState;
pub use widget::{FALLBACK_DISTANCE2, InteractionEvent, SliceIntersectionWidget, WidgetState};
