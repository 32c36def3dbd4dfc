// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{ObserverId, PlaneId};

/// Errors reported by [`Scene`](crate::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The plane was never added or has been removed.
    #[error("unknown view plane {0:?}")]
    UnknownPlane(PlaneId),
    /// The observer was never registered or has been unregistered.
    #[error("unknown observer {0:?}")]
    UnknownObserver(ObserverId),
    /// `end_modify` was called without a matching `start_modify`.
    #[error("end_modify on {0:?} without a matching start_modify")]
    UnbalancedModify(PlaneId),
}
