// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=reslice_view --heading-base-level=0

//! Reslice View: cameras, projection and shared widget-representation state.
//!
//! This crate provides the view-side pieces every reslice widget needs:
//! - [`Camera`] / [`Renderer`]: a look-at camera with parallel or perspective
//!   projection, and conversion between world and display coordinates.
//! - [`WidgetRepresentation`]: state common to all representations (render
//!   requests, picking tolerance, screen scale, handle size) and the
//!   computation of world units per pixel for slice and 3D views.
//! - [`CursorShape`]: cursors a widget can ask its host for.
//!
//! It does **not** draw anything. Hosts read the representation state and
//! render it with whatever backend they use.
//!
//! ## Minimal example
//!
//! ```rust
//! use glam::DVec3;
//! use kurbo::Rect;
//! use reslice_view::{Camera, Renderer};
//!
//! let mut renderer = Renderer::new(Rect::new(0.0, 0.0, 400.0, 300.0));
//! renderer.camera = Camera {
//!     position: DVec3::new(0.0, 0.0, 100.0),
//!     parallel_projection: true,
//!     parallel_scale: 150.0,
//!     ..Camera::default()
//! };
//!
//! // One world unit per pixel: the view is 300 units high.
//! assert_eq!(renderer.view_scale_factor_at(DVec3::ZERO), 1.0);
//! let centre = renderer.world_to_display(DVec3::ZERO);
//! assert!((centre.x - 200.0).abs() < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod camera;
mod cursor;
mod representation;

pub use camera::{Camera, Renderer};
pub use cursor::CursorShape;
pub use representation::{DEFAULT_PICKING_TOLERANCE, InteractionSizeMode, WidgetRepresentation};
