// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Saving an image's annotations to the backend.
//!
//! A save runs in three steps so the network part can run away from the
//! store: `prepare` snapshots the image's annotations into a batch,
//! `execute` sends the batch one request at a time, and `apply` writes the
//! per-annotation results back and folds them into a [`SaveOutcome`].
//! Every annotation is attempted even when an earlier one fails.

use crate::error::ValidationError;
use crate::io::repository::{AnnotationRepository, PersistRequest};
use crate::models::{
    annotation::{LocalId, SaveStatus},
    image::ImageId,
    store::AnnotationStore,
};
use serde::{Deserialize, Serialize};

/// Whether a repeated save re-sends annotations the backend already accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Only send annotations not yet tagged `saved`.
    #[default]
    SkipSaved,
    /// Send every annotation on every save.
    ResendAll,
}

/// Snapshot of the writes for one image.
#[derive(Debug, Clone)]
pub struct SaveBatch {
    image: ImageId,
    entries: Vec<(LocalId, Result<PersistRequest, ValidationError>)>,
}

impl SaveBatch {
    pub fn image(&self) -> &ImageId {
        &self.image
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-annotation results of an executed batch, in request order.
#[derive(Debug, Clone)]
pub struct SaveReport {
    image: ImageId,
    results: Vec<(LocalId, Result<(), String>)>,
}

impl SaveReport {
    pub fn image(&self) -> &ImageId {
        &self.image
    }
}

/// Aggregated result of saving one image.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The image had no annotations; no request was made.
    NothingToSave,
    /// Every attempted write succeeded. `saved` lists the annotations sent
    /// by this save; it is empty when everything was already saved.
    AllSaved { saved: Vec<LocalId> },
    PartialFailure {
        succeeded: Vec<LocalId>,
        failed: Vec<(LocalId, String)>,
    },
    TotalFailure {
        reason: String,
        failed: Vec<(LocalId, String)>,
    },
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SaveOutcome::NothingToSave | SaveOutcome::AllSaved { .. })
    }

    /// One-line description for logs and notices.
    pub fn summary(&self) -> String {
        match self {
            SaveOutcome::NothingToSave => "No annotations to save.".to_string(),
            SaveOutcome::AllSaved { saved } if saved.is_empty() => {
                "All annotations were already saved.".to_string()
            }
            SaveOutcome::AllSaved { saved } => {
                format!("Saved {} annotation(s) successfully.", saved.len())
            }
            SaveOutcome::PartialFailure { succeeded, failed } => format!(
                "Saved {} annotation(s), {} failed.",
                succeeded.len(),
                failed.len()
            ),
            SaveOutcome::TotalFailure { reason, failed } => {
                format!("Failed to save {} annotation(s): {}", failed.len(), reason)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SaveCoordinator {
    policy: RetryPolicy,
}

impl SaveCoordinator {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Snapshot the image's annotations into a batch and tag the sendable
    /// ones `saving`. Returns `None` when the image has no annotations.
    pub fn prepare(&self, store: &mut AnnotationStore, image: &ImageId) -> Option<SaveBatch> {
        let annotations = store.annotations(image);
        if annotations.is_empty() {
            return None;
        }

        let entries: Vec<_> = annotations
            .iter()
            .filter(|a| self.policy == RetryPolicy::ResendAll || !a.status.is_saved())
            .map(|a| {
                (
                    a.local_id().clone(),
                    PersistRequest::from_annotation(image, a),
                )
            })
            .collect();

        for (id, request) in &entries {
            if request.is_ok() {
                store.set_status(image, id, SaveStatus::Saving);
            }
        }

        Some(SaveBatch {
            image: image.clone(),
            entries,
        })
    }

    /// Send the batch strictly in order, one request at a time. Invalid
    /// entries are reported as failures without touching the repository.
    pub fn execute<R>(batch: SaveBatch, repository: &R) -> SaveReport
    where
        R: AnnotationRepository + ?Sized,
    {
        let SaveBatch { image, entries } = batch;
        let mut results = Vec::with_capacity(entries.len());

        for (id, request) in entries {
            let result = match request {
                Ok(request) => {
                    log::debug!("Sending payload: {:?}", request);
                    repository
                        .persist_annotation(&request)
                        .map(|ack| log::debug!("Annotation {} acknowledged: {}", id, ack.body))
                        .map_err(|e| {
                            log::warn!("Annotation {} on image {} not saved: {}", id, image, e);
                            e.to_string()
                        })
                }
                Err(e) => {
                    log::warn!("Annotation {} on image {} rejected: {}", id, image, e);
                    Err(e.to_string())
                }
            };
            results.push((id, result));
        }

        SaveReport { image, results }
    }

    /// Tag each annotation with its result and aggregate the outcome.
    pub fn apply(store: &mut AnnotationStore, report: SaveReport) -> SaveOutcome {
        let SaveReport { image, results } = report;
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for (id, result) in results {
            match result {
                Ok(()) => {
                    store.set_status(&image, &id, SaveStatus::Saved);
                    succeeded.push(id);
                }
                Err(reason) => {
                    store.set_status(&image, &id, SaveStatus::Failed(reason.clone()));
                    failed.push((id, reason));
                }
            }
        }

        let outcome = if failed.is_empty() {
            SaveOutcome::AllSaved { saved: succeeded }
        } else if succeeded.is_empty() {
            let reason = failed[0].1.clone();
            SaveOutcome::TotalFailure { reason, failed }
        } else {
            SaveOutcome::PartialFailure { succeeded, failed }
        };

        if outcome.is_success() {
            log::info!("Image {}: {}", image, outcome.summary());
        } else {
            log::warn!("Image {}: {}", image, outcome.summary());
        }
        outcome
    }

    /// Prepare, execute and apply in one go.
    #[cfg(test)]
    pub fn save<R>(&self, store: &mut AnnotationStore, image: &ImageId, repository: &R) -> SaveOutcome
    where
        R: AnnotationRepository + ?Sized,
    {
        match self.prepare(store, image) {
            Some(batch) => Self::apply(store, Self::execute(batch, repository)),
            None => {
                log::info!("Image {}: nothing to save", image);
                SaveOutcome::NothingToSave
            }
        }
    }
}
