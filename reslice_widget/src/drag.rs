// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer tracking between a button press and its release.
//!
//! ## Usage
//!
//! 1) Call [`DragState::start`] with the press position.
//! 2) Feed every move to [`DragState::update`]; it returns the step since the
//!    previous position.
//! 3) Call [`DragState::end`] on release; it reports whether the pointer
//!    moved at all, so a press and release in place can still count as a click.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use reslice_widget::DragState;
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 20.0));
//! assert_eq!(drag.update(Point::new(10.0, 20.0)), Some(Vec2::ZERO));
//! assert!(!drag.has_moved());
//!
//! assert_eq!(drag.update(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! assert_eq!(drag.total_offset(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! assert!(drag.end());
//! assert!(!drag.is_dragging());
//! ```

use kurbo::{Point, Vec2};

/// Press position, last position and whether the pointer moved in between.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct DragState {
    /// Where the button went down.
    pub start_pos: Option<Point>,
    /// Last position seen during the drag.
    pub last_pos: Option<Point>,
    moved: bool,
}

impl DragState {
    /// Starts tracking from the press position.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.moved = false;
    }

    /// Records a move, returning the step since the previous position.
    ///
    /// Returns `None` when no drag is in progress.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let last = self.last_pos.replace(pos).unwrap_or(pos);
        let delta = pos - last;
        if delta != Vec2::ZERO {
            self.moved = true;
        }
        Some(delta)
    }

    /// Offset of `pos` from the press position.
    #[must_use]
    pub fn total_offset(&self, pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| pos - start)
    }

    /// Whether the pointer moved since the press.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Stops tracking, returning whether the pointer moved since the press.
    pub fn end(&mut self) -> bool {
        let moved = self.moved;
        *self = Self::default();
        moved
    }

    /// Returns `true` while a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_state_ignores_moves() {
        let mut drag = DragState::default();
        assert_eq!(drag.update(Point::new(1.0, 2.0)), None);
        assert!(drag.last_pos.is_none());
        assert_eq!(drag.total_offset(Point::new(1.0, 2.0)), None);
        assert!(!drag.end());
    }

    #[test]
    fn steps_are_incremental() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0));
        assert_eq!(drag.update(Point::new(3.0, 0.0)), Some(Vec2::new(3.0, 0.0)));
        assert_eq!(drag.update(Point::new(3.0, 4.0)), Some(Vec2::new(0.0, 4.0)));
        assert_eq!(drag.total_offset(Point::new(3.0, 4.0)), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn moving_back_to_the_start_still_counts() {
        let mut drag = DragState::default();
        drag.start(Point::new(5.0, 5.0));
        drag.update(Point::new(6.0, 5.0));
        drag.update(Point::new(5.0, 5.0));
        assert_eq!(drag.total_offset(Point::new(5.0, 5.0)), Some(Vec2::ZERO));
        assert!(drag.end());
    }

    #[test]
    fn restart_clears_the_moved_flag() {
        let mut drag = DragState::default();
        drag.start(Point::ORIGIN);
        drag.update(Point::new(1.0, 0.0));
        drag.start(Point::new(1.0, 0.0));
        assert!(!drag.has_moved());
        assert_eq!(drag.start_pos, drag.last_pos);
    }
}
