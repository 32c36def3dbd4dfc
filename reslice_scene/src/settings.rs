// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-plane display settings for slice intersections and their handles.

bitflags::bitflags! {
    /// Switches controlling how intersection lines of other planes appear in a view.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SliceIntersectionFlags: u8 {
        /// Intersection lines are drawn.
        const VISIBLE                = 0b0000_0001;
        /// Intersection lines can be grabbed.
        const INTERACTIVE            = 0b0000_0010;
        /// Translation handles are offered.
        const TRANSLATION            = 0b0000_0100;
        /// Rotation handles are offered.
        const ROTATION               = 0b0000_1000;
        /// Thick-slab boundary lines are drawn.
        const THICK_SLAB_VISIBLE     = 0b0001_0000;
        /// Thick-slab boundary handles can be grabbed.
        const THICK_SLAB_INTERACTIVE = 0b0010_0000;
    }
}

impl Default for SliceIntersectionFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::INTERACTIVE | Self::TRANSLATION | Self::ROTATION
    }
}

/// How intersection lines are drawn around their common crossing point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntersectionMode {
    /// Lines run through the crossing point.
    FullLines,
    /// Lines stop short of the crossing point, leaving a gap.
    #[default]
    SkipLineCrossings,
}

/// When interaction handles are shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandlesVisibilityMode {
    /// Handles are never shown.
    NeverVisible,
    /// Handles are shown while the pointer is near one of them.
    #[default]
    NearbyVisible,
    /// Handles are always shown.
    AlwaysVisible,
    /// Handles fade in as the pointer approaches.
    FadeVisible,
}

/// Width of intersection lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineThicknessMode {
    /// One pixel.
    #[default]
    Fine,
    /// Two pixels.
    Medium,
    /// Three pixels.
    Thick,
}

impl LineThicknessMode {
    /// Line width in pixels.
    #[must_use]
    pub const fn width(self) -> f64 {
        match self {
            Self::Fine => 1.0,
            Self::Medium => 2.0,
            Self::Thick => 3.0,
        }
    }
}

/// Interactive parts of a slice-intersection display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Nothing.
    #[default]
    None,
    /// The intersection display as a whole, used while a drag is in progress.
    SliceIntersection,
    /// Arc-arrow handle rotating every intersecting plane about the crossing point.
    RotateIntersectingSlices,
    /// Centre disc moving every intersecting plane.
    TranslateIntersectingSlices,
    /// Double-arrow handle moving a single intersecting plane.
    TranslateSingleIntersectingSlice,
    /// Handle on a thick-slab boundary changing the slab thickness.
    TranslateThickSlab,
}

impl ComponentType {
    /// Returns `true` for the handle components that can be picked.
    #[must_use]
    pub const fn is_handle(self) -> bool {
        matches!(
            self,
            Self::RotateIntersectingSlices
                | Self::TranslateIntersectingSlices
                | Self::TranslateSingleIntersectingSlice
                | Self::TranslateThickSlab
        )
    }
}

/// The component the user is currently hovering or dragging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActiveComponent {
    /// Kind of component.
    pub component: ComponentType,
    /// Index of the component among those of its kind, if any.
    pub index: Option<usize>,
}

impl ActiveComponent {
    /// No active component.
    pub const NONE: Self = Self {
        component: ComponentType::None,
        index: None,
    };

    /// Creates an active component.
    #[must_use]
    pub const fn new(component: ComponentType, index: Option<usize>) -> Self {
        Self { component, index }
    }
}

/// Display settings of one view plane.
///
/// These control how the lines of *other* planes are drawn inside this
/// plane's view, and which of their handles can be used.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplaySettings {
    /// Visibility and interaction switches.
    pub flags: SliceIntersectionFlags,
    /// Gap handling at the crossing point.
    pub intersection_mode: IntersectionMode,
    /// Handle visibility policy.
    pub handles_visibility_mode: HandlesVisibilityMode,
    /// Line width.
    pub line_thickness: LineThicknessMode,
    /// Component under the pointer or being dragged.
    pub active_component: ActiveComponent,
}

impl DisplaySettings {
    /// Lines are both shown and interactive.
    #[must_use]
    pub fn intersections_interactive(&self) -> bool {
        self.flags
            .contains(SliceIntersectionFlags::VISIBLE | SliceIntersectionFlags::INTERACTIVE)
    }

    /// Translation handles are enabled.
    #[must_use]
    pub fn translation_enabled(&self) -> bool {
        self.flags.contains(SliceIntersectionFlags::TRANSLATION)
    }

    /// Rotation handles are enabled.
    #[must_use]
    pub fn rotation_enabled(&self) -> bool {
        self.flags.contains(SliceIntersectionFlags::ROTATION)
    }

    /// Thick-slab lines are shown.
    #[must_use]
    pub fn thick_slab_visible(&self) -> bool {
        self.flags.contains(SliceIntersectionFlags::THICK_SLAB_VISIBLE)
    }

    /// Thick-slab handles can be used.
    #[must_use]
    pub fn thick_slab_interactive(&self) -> bool {
        self.flags.contains(
            SliceIntersectionFlags::THICK_SLAB_VISIBLE
                | SliceIntersectionFlags::THICK_SLAB_INTERACTIVE,
        )
    }

    /// Something is hovered or dragged.
    #[must_use]
    pub fn has_active_component(&self) -> bool {
        self.active_component.component != ComponentType::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_interactive_without_thick_slab() {
        let settings = DisplaySettings::default();
        assert!(settings.intersections_interactive());
        assert!(settings.translation_enabled());
        assert!(settings.rotation_enabled());
        assert!(!settings.thick_slab_visible());
        assert!(!settings.has_active_component());
        assert_eq!(settings.intersection_mode, IntersectionMode::SkipLineCrossings);
    }

    #[test]
    fn thick_slab_interaction_requires_visibility() {
        let settings = DisplaySettings {
            flags: SliceIntersectionFlags::THICK_SLAB_INTERACTIVE,
            ..DisplaySettings::default()
        };
        assert!(!settings.thick_slab_interactive());
    }

    #[test]
    fn only_handles_are_handles() {
        assert!(!ComponentType::None.is_handle());
        assert!(!ComponentType::SliceIntersection.is_handle());
        assert!(ComponentType::TranslateThickSlab.is_handle());
    }
}
