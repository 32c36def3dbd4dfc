// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=reslice_geometry --heading-base-level=0

//! Reslice Geometry: stateless helpers for intersecting view planes.
//!
//! A view plane is a rectangle of pixels placed in 3D world space by a pose
//! matrix. When two such planes cross, the crossing shows up in each view as a
//! line. This crate computes that line and the small amount of 2D geometry
//! needed to decorate it with interaction handles:
//!
//! - [`intersect_finite_plane`] / [`line_tips_from_plane`]: where a rectangle
//!   crosses an infinite plane.
//! - [`segment_viewport_intersection`] / [`viewport_bounds`]: clipping line
//!   tips against the visible part of a view.
//! - [`rotation_matrix_between_vectors`] / [`handle_to_world_transform`]:
//!   placing glyphs that were authored pointing along a default direction.
//! - [`segment_intersection`]: parametric intersection of two segments, used
//!   to find the common crossing point of several lines.
//! - [`slab_offset_in_plane`]: how far a thick slab boundary sits from its
//!   centre line inside another view.
//!
//! All functions are pure. Degenerate input yields `None` or an identity
//! transform, never a panic.
//!
//! ## Minimal example
//!
//! ```rust
//! use glam::{DMat4, DVec3};
//! use reslice_geometry::line_tips_from_plane;
//!
//! // A 100x100 pixel plane standing upright along the current view's y axis,
//! // crossing the current view at x = 40.
//! let other_to_current = DMat4::from_cols_array(&[
//!     0.0, 0.0, 1.0, 0.0, // other x -> current z
//!     0.0, 1.0, 0.0, 0.0, // other y -> current y
//!     1.0, 0.0, 0.0, 0.0, // other z -> current x
//!     40.0, 0.0, -50.0, 1.0,
//! ]);
//! let (a, b) = line_tips_from_plane((100, 100), other_to_current).unwrap();
//! assert_eq!(a.x, 40.0);
//! assert_eq!(b.x, 40.0);
//! assert_eq!((a.y - b.y).abs(), 100.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod line;
mod plane;
mod rotation;
mod viewport;

pub use line::{extended_segment, segment_intersection};
pub use plane::{
    intersect_finite_plane, intersect_plane_with_segment, line_tips_from_plane,
    slab_offset_in_plane,
};
pub use rotation::{
    DEFAULT_HANDLE_ORIENTATION, DEFAULT_HANDLE_POSITION, handle_to_world_transform,
    rotation_about_axis, rotation_matrix_between_vectors,
};
pub use viewport::{
    contains_strictly, segment_viewport_intersection, shrink_bounds, viewport_bounds,
};
