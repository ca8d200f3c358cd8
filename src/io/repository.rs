// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Backend boundary.
//!
//! The session only talks to the backend through these two traits, so the
//! HTTP adapter can be swapped for an in-memory one in tests.

use crate::error::{FetchError, PersistError, ValidationError};
use crate::models::{annotation::CommittedAnnotation, image::Image, image::ImageId};
use serde::{Deserialize, Serialize};

/// Source of the image sequence for a session.
pub trait ImageRepository {
    fn fetch_images(&self) -> Result<Vec<Image>, FetchError>;
}

/// Sink for committed annotations, one call per annotation.
pub trait AnnotationRepository {
    fn persist_annotation(&self, request: &PersistRequest) -> Result<PersistAck, PersistError>;
}

/// Body of a single annotation write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistRequest {
    pub image: ImageId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PersistRequest {
    /// Build the write for an annotation, refusing anything the backend
    /// should never see.
    pub fn from_annotation(
        image: &ImageId,
        annotation: &CommittedAnnotation,
    ) -> Result<Self, ValidationError> {
        let geometry = annotation.geometry();
        if !geometry.is_finite() {
            return Err(ValidationError::NonFiniteGeometry);
        }
        if geometry.is_degenerate() {
            return Err(ValidationError::DegenerateGeometry {
                width: geometry.width,
                height: geometry.height,
            });
        }
        let label = annotation.label().trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel);
        }

        Ok(Self {
            image: image.clone(),
            label: label.to_string(),
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
        })
    }
}

/// Backend acknowledgement of a write; whatever JSON the server returned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistAck {
    pub body: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Geometry;

    #[test]
    fn test_request_payload_shape() {
        let annotation = CommittedAnnotation::new(Geometry::new(10.0, 10.0, 50.0, 50.0), "dog".into());
        let request = PersistRequest::from_annotation(&ImageId::Number(1), &annotation).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "image": 1,
                "label": "dog",
                "x": 10.0,
                "y": 10.0,
                "width": 50.0,
                "height": 50.0,
            })
        );
        assert!(json["x"].is_f64());
        assert!(json.get("local_id").is_none());
    }

    #[test]
    fn test_request_rejects_invalid_annotations() {
        let image = ImageId::Number(1);
        let flat = CommittedAnnotation::new(Geometry::new(0.0, 0.0, 0.0, 5.0), "dog".into());
        assert!(matches!(
            PersistRequest::from_annotation(&image, &flat),
            Err(ValidationError::DegenerateGeometry { .. })
        ));

        let unlabelled = CommittedAnnotation::new(Geometry::new(0.0, 0.0, 5.0, 5.0), " ".into());
        assert_eq!(
            PersistRequest::from_annotation(&image, &unlabelled),
            Err(ValidationError::EmptyLabel)
        );
    }
}
