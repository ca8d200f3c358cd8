// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the session and the repository boundary.

use thiserror::Error;

/// The image list could not be obtained. Fatal to session start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Failed to load images: {0}")]
    Transport(String),
    #[error("Failed to load images: server responded with status {0}")]
    Status(u16),
    #[error("Failed to load images: invalid response ({0})")]
    Decode(String),
}

/// One annotation could not be saved. Recoverable; the batch continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistError {
    #[error("Failed to save annotation: {0}")]
    Transport(String),
    #[error("Failed to save annotation: server responded with status {status} {body}")]
    Status { status: u16, body: String },
}

/// A shape that must never reach the network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("annotation has no label")]
    EmptyLabel,
    #[error("annotation has zero area ({width} x {height})")]
    DegenerateGeometry { width: f64, height: f64 },
    #[error("annotation geometry is not finite")]
    NonFiniteGeometry,
}

/// Misuse of the session API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("no image is selected")]
    NoImage,
    #[error("no shape is being edited")]
    NoDraft,
    #[error("a save is already in progress")]
    SaveInFlight,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
