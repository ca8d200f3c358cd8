// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image annotation storage.
//!
//! The store owns every committed annotation of a session, keyed by the
//! image it was drawn on. A key only exists once an image has received
//! its first commit; a missing key reads as an empty sequence.

use super::annotation::{CommittedAnnotation, Geometry, LocalId, SaveStatus};
use super::image::ImageId;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct AnnotationStore {
    entries: HashMap<ImageId, Vec<CommittedAnnotation>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new annotation to the image's sequence and return its id.
    pub fn commit(&mut self, image: &ImageId, geometry: Geometry, label: String) -> LocalId {
        let annotation = CommittedAnnotation::new(geometry, label);
        let id = annotation.local_id().clone();
        self.entries.entry(image.clone()).or_default().push(annotation);
        id
    }

    /// Annotations of an image in creation order.
    pub fn annotations(&self, image: &ImageId) -> &[CommittedAnnotation] {
        self.entries.get(image).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, image: &ImageId) -> usize {
        self.annotations(image).len()
    }

    pub fn is_empty(&self, image: &ImageId) -> bool {
        self.len(image) == 0
    }

    /// Number of images holding at least one annotation.
    pub fn image_count(&self) -> usize {
        self.entries.len()
    }

    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn get(&self, image: &ImageId, id: &LocalId) -> Option<&CommittedAnnotation> {
        self.annotations(image).iter().find(|a| a.local_id() == id)
    }

    /// Update the save status of one annotation. Returns `false` if it is unknown.
    pub fn set_status(&mut self, image: &ImageId, id: &LocalId, status: SaveStatus) -> bool {
        let found = self
            .entries
            .get_mut(image)
            .and_then(|list| list.iter_mut().find(|a| a.local_id() == id));

        match found {
            Some(annotation) => {
                annotation.status = status;
                true
            }
            None => false,
        }
    }

    /// Tag every annotation still marked `saving` on the image as failed.
    /// Used when a save never reported back.
    pub fn fail_in_flight(&mut self, image: &ImageId, reason: &str) -> usize {
        let mut count = 0;
        if let Some(list) = self.entries.get_mut(image) {
            for annotation in list.iter_mut().filter(|a| a.status == SaveStatus::Saving) {
                annotation.status = SaveStatus::Failed(reason.to_string());
                count += 1;
            }
        }
        count
    }
}
