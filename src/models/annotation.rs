// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the rectangle geometry shared by drafts and
//! committed annotations, the local identity of a committed annotation,
//! and the save status the save coordinator attaches to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned rectangle in the coordinate space of the canvas.
///
/// The values are forwarded to the backend untouched; the session only
/// checks them for being finite and non-degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    /// Create a geometry, folding negative extents back onto the origin so
    /// that `width` and `height` are never negative.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        Self { x, y, width, height }
    }

    /// Create the rectangle spanned by two opposite corners.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// A zero-area rectangle carries no information and is never committed.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Kind of shape being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
}

/// The shape currently being edited, not yet bound to any image.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftAnnotation {
    pub geometry: Geometry,
    pub label: String,
    pub kind: ShapeKind,
}

impl DraftAnnotation {
    pub fn new(geometry: Geometry, kind: ShapeKind) -> Self {
        Self {
            geometry,
            label: String::new(),
            kind,
        }
    }

    /// The label with surrounding whitespace removed, or `None` if nothing is left.
    pub fn trimmed_label(&self) -> Option<&str> {
        let label = self.label.trim();
        (!label.is_empty()).then_some(label)
    }
}

/// Client-side identity of a committed annotation. Never sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(String);

impl LocalId {
    /// Allocate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistence state of a committed annotation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Unsaved,
    Saving,
    Saved,
    Failed(String),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStatus::Unsaved => f.write_str("unsaved"),
            SaveStatus::Saving => f.write_str("saving"),
            SaveStatus::Saved => f.write_str("saved"),
            SaveStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// A finalized rectangle and label stored against one image.
///
/// Geometry and label are fixed at creation; only the status changes.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedAnnotation {
    local_id: LocalId,
    geometry: Geometry,
    label: String,
    pub status: SaveStatus,
}

impl CommittedAnnotation {
    pub fn new(geometry: Geometry, label: String) -> Self {
        Self {
            local_id: LocalId::generate(),
            geometry,
            label,
            status: SaveStatus::Unsaved,
        }
    }

    pub fn local_id(&self) -> &LocalId {
        &self.local_id
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
