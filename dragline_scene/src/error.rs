// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::types::ElementId;

/// Reasons a structural scene mutation can be refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// The handle refers to a destroyed element (or a reused slot).
    StaleElement(ElementId),
    /// The operation requires an element reachable from the body.
    NotConnected(ElementId),
    /// Inserting `child` under `parent` would create a cycle or move the body.
    HierarchyRequest {
        /// Requested parent.
        parent: ElementId,
        /// Requested child.
        child: ElementId,
    },
    /// `child` is not a light child of `parent`.
    NotAChild {
        /// Expected parent.
        parent: ElementId,
        /// Offending reference element.
        child: ElementId,
    },
    /// The host has no shadow root attached.
    NoShadowRoot(ElementId),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleElement(id) => write!(f, "element {id:?} is no longer alive"),
            Self::NotConnected(id) => write!(f, "element {id:?} is not connected to the document"),
            Self::HierarchyRequest { parent, child } => {
                write!(f, "cannot insert {child:?} under {parent:?}")
            }
            Self::NotAChild { parent, child } => {
                write!(f, "{child:?} is not a child of {parent:?}")
            }
            Self::NoShadowRoot(id) => write!(f, "element {id:?} has no shadow root"),
        }
    }
}

impl core::error::Error for SceneError {}
