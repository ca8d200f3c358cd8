// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation session state.
//!
//! A session ties together the image sequence, the committed annotations
//! of every visited image, the shape currently being drawn and the save
//! latch. It is created once the image list has been fetched and lives
//! until the application closes.

use super::{
    annotation::{CommittedAnnotation, DraftAnnotation, Geometry, LocalId, ShapeKind},
    draft::{DraftState, Finalized},
    image::{Image, ImageId},
    navigator::Navigator,
    store::AnnotationStore,
};
use crate::error::{FetchError, SessionError, ValidationError};
use crate::io::repository::{AnnotationRepository, ImageRepository};
use crate::save::{RetryPolicy, SaveBatch, SaveCoordinator, SaveOutcome, SaveReport};

/// Result of committing the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Committed(LocalId),
    /// The shape had no usable area and was dropped.
    Discarded(ValidationError),
}

/// Guards against overlapping save sequences.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum SaveLatch {
    #[default]
    Idle,
    Pending(ImageId),
}

#[derive(Debug, Default)]
pub struct Session {
    navigator: Navigator,
    store: AnnotationStore,
    draft: DraftState,
    coordinator: SaveCoordinator,
    latch: SaveLatch,
}

impl Session {
    pub fn new(images: Vec<Image>, policy: RetryPolicy) -> Self {
        Self {
            navigator: Navigator::new(images),
            store: AnnotationStore::new(),
            draft: DraftState::Idle,
            coordinator: SaveCoordinator::new(policy),
            latch: SaveLatch::Idle,
        }
    }

    /// Fetch the image list and start a session over it.
    pub fn load<R>(repository: &R, policy: RetryPolicy) -> Result<Self, FetchError>
    where
        R: ImageRepository + ?Sized,
    {
        let images = repository.fetch_images()?;
        log::info!("Loaded {} images", images.len());
        Ok(Self::new(images, policy))
    }

    pub fn current(&self) -> Option<&Image> {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Committed annotations of the image under the cursor.
    pub fn current_annotations(&self) -> &[CommittedAnnotation] {
        match self.navigator.current() {
            Some(image) => self.store.annotations(&image.id),
            None => &[],
        }
    }

    pub fn next(&mut self) -> Option<&Image> {
        self.step(true)
    }

    pub fn previous(&mut self) -> Option<&Image> {
        self.step(false)
    }

    fn step(&mut self, forward: bool) -> Option<&Image> {
        let before = self.navigator.cursor();
        if forward {
            self.navigator.next();
        } else {
            self.navigator.previous();
        }

        if self.navigator.cursor() != before {
            if self.draft.is_editing() {
                self.draft.discard();
                log::debug!("Discarded unfinished shape on navigation");
            }
            log::info!(
                "Showing image {}/{}",
                self.navigator.cursor() + 1,
                self.navigator.len()
            );
        }
        self.navigator.current()
    }

    pub fn draft(&self) -> Option<&DraftAnnotation> {
        self.draft.draft()
    }

    /// Start drawing a new shape on the current image.
    pub fn begin_draft(&mut self, geometry: Geometry, kind: ShapeKind) -> Result<(), SessionError> {
        if self.navigator.current().is_none() {
            return Err(SessionError::NoImage);
        }
        self.draft.begin(geometry, kind);
        Ok(())
    }

    pub fn update_draft(&mut self, geometry: Geometry) -> bool {
        self.draft.update_geometry(geometry)
    }

    pub fn set_draft_label(&mut self, label: impl Into<String>) -> bool {
        self.draft.set_label(label)
    }

    pub fn cancel_draft(&mut self) -> Option<DraftAnnotation> {
        self.draft.discard()
    }

    /// Move the draft into the store under the current image.
    pub fn commit_draft(&mut self) -> Result<CommitOutcome, SessionError> {
        let image = match self.navigator.current() {
            Some(image) => image.id.clone(),
            None => return Err(SessionError::NoImage),
        };

        match self.draft.finalize()? {
            Finalized::Ready { geometry, label } => {
                log::info!("Committed '{}' on image {}", label, image);
                let id = self.store.commit(&image, geometry, label);
                Ok(CommitOutcome::Committed(id))
            }
            Finalized::Discarded(reason) => {
                log::info!("Discarded shape on image {}: {}", image, reason);
                Ok(CommitOutcome::Discarded(reason))
            }
        }
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.latch, SaveLatch::Pending(_))
    }

    /// A save can start when nothing is in flight and the current image has
    /// at least one committed annotation.
    pub fn can_save(&self) -> bool {
        !self.is_saving()
            && self
                .navigator
                .current()
                .is_some_and(|image| !self.store.is_empty(&image.id))
    }

    /// Start saving the current image. `Ok(None)` means there was nothing to
    /// save and the latch stays open.
    pub fn begin_save(&mut self) -> Result<Option<SaveBatch>, SessionError> {
        if self.is_saving() {
            return Err(SessionError::SaveInFlight);
        }
        let image = match self.navigator.current() {
            Some(image) => image.id.clone(),
            None => return Err(SessionError::NoImage),
        };

        let batch = self.coordinator.prepare(&mut self.store, &image);
        if batch.is_some() {
            self.latch = SaveLatch::Pending(image);
        }
        Ok(batch)
    }

    /// Apply the results of a batch started with [`Session::begin_save`].
    pub fn finish_save(&mut self, report: SaveReport) -> SaveOutcome {
        self.latch = SaveLatch::Idle;
        SaveCoordinator::apply(&mut self.store, report)
    }

    /// Release the latch when a save never reported back; annotations left
    /// `saving` are marked failed so they are retried.
    pub fn abandon_save(&mut self, reason: &str) {
        if let SaveLatch::Pending(image) = std::mem::take(&mut self.latch) {
            let count = self.store.fail_in_flight(&image, reason);
            log::warn!("Save of image {} abandoned, {} annotation(s) affected: {}", image, count, reason);
        }
    }

    /// Save the current image synchronously.
    #[cfg(test)]
    pub fn save<R>(&mut self, repository: &R) -> Result<SaveOutcome, SessionError>
    where
        R: AnnotationRepository + ?Sized,
    {
        match self.begin_save()? {
            Some(batch) => {
                let report = SaveCoordinator::execute(batch, repository);
                Ok(self.finish_save(report))
            }
            None => Ok(SaveOutcome::NothingToSave),
        }
    }
}
