// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Draft annotation lifecycle.
//!
//! At most one shape is being edited at a time. The canvas reports the
//! start of a drag and every geometry change after it; the user finalizes
//! the shape with a label or abandons it.
//!
//! ```text
//! Idle --begin--> Editing --update/label--> Editing
//! Editing --finalize (labelled, non-degenerate)--> Idle   (committed)
//! Editing --finalize (degenerate) / discard--> Idle       (discarded)
//! ```

use super::annotation::{DraftAnnotation, Geometry, ShapeKind};
use crate::error::{SessionError, ValidationError};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DraftState {
    #[default]
    Idle,
    Editing(DraftAnnotation),
}

/// Result of finalizing the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum Finalized {
    /// The draft is valid and has been taken out of the slot.
    Ready { geometry: Geometry, label: String },
    /// The draft carried no usable shape and was dropped.
    Discarded(ValidationError),
}

impl DraftState {
    pub fn is_editing(&self) -> bool {
        matches!(self, DraftState::Editing(_))
    }

    pub fn draft(&self) -> Option<&DraftAnnotation> {
        match self {
            DraftState::Editing(draft) => Some(draft),
            DraftState::Idle => None,
        }
    }

    /// Start editing a new shape. An unfinished previous shape is replaced.
    pub fn begin(&mut self, geometry: Geometry, kind: ShapeKind) {
        *self = DraftState::Editing(DraftAnnotation::new(geometry, kind));
    }

    /// Replace the draft geometry. Returns `false` when nothing is being edited.
    pub fn update_geometry(&mut self, geometry: Geometry) -> bool {
        match self {
            DraftState::Editing(draft) => {
                draft.geometry = geometry;
                true
            }
            DraftState::Idle => false,
        }
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> bool {
        match self {
            DraftState::Editing(draft) => {
                draft.label = label.into();
                true
            }
            DraftState::Idle => false,
        }
    }

    /// Drop the current draft, if any.
    pub fn discard(&mut self) -> Option<DraftAnnotation> {
        match std::mem::take(self) {
            DraftState::Editing(draft) => Some(draft),
            DraftState::Idle => None,
        }
    }

    /// Take the draft out for committing.
    ///
    /// Degenerate or non-finite shapes are discarded. A missing label is an
    /// error and leaves the draft in place so a label can still be entered.
    pub fn finalize(&mut self) -> Result<Finalized, SessionError> {
        let draft = match self {
            DraftState::Idle => return Err(SessionError::NoDraft),
            DraftState::Editing(draft) => draft,
        };

        let geometry = draft.geometry;
        if !geometry.is_finite() {
            *self = DraftState::Idle;
            return Ok(Finalized::Discarded(ValidationError::NonFiniteGeometry));
        }
        if geometry.is_degenerate() {
            *self = DraftState::Idle;
            return Ok(Finalized::Discarded(ValidationError::DegenerateGeometry {
                width: geometry.width,
                height: geometry.height,
            }));
        }

        let label = match draft.trimmed_label() {
            Some(label) => label.to_string(),
            None => return Err(ValidationError::EmptyLabel.into()),
        };

        *self = DraftState::Idle;
        Ok(Finalized::Ready { geometry, label })
    }
}
