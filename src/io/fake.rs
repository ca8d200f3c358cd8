// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory repositories for tests.

use super::repository::{AnnotationRepository, ImageRepository, PersistAck, PersistRequest};
use crate::error::{FetchError, PersistError};
use crate::models::image::Image;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// Serves a fixed image list, or a fixed failure.
pub struct StaticImages {
    result: Result<Vec<Image>, FetchError>,
    pub calls: Cell<usize>,
}

impl StaticImages {
    pub fn new(images: Vec<Image>) -> Self {
        Self {
            result: Ok(images),
            calls: Cell::new(0),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            result: Err(error),
            calls: Cell::new(0),
        }
    }
}

impl ImageRepository for StaticImages {
    fn fetch_images(&self) -> Result<Vec<Image>, FetchError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

/// Records every write and fails the calls it was told to fail.
#[derive(Default)]
pub struct ScriptedAnnotations {
    /// 1-based call numbers that fail.
    fail_calls: HashSet<usize>,
    fail_all: bool,
    pub requests: RefCell<Vec<PersistRequest>>,
}

impl ScriptedAnnotations {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing_calls(calls: &[usize]) -> Self {
        Self {
            fail_calls: calls.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.label.clone()).collect()
    }
}

impl AnnotationRepository for ScriptedAnnotations {
    fn persist_annotation(&self, request: &PersistRequest) -> Result<PersistAck, PersistError> {
        let call = {
            let mut requests = self.requests.borrow_mut();
            requests.push(request.clone());
            requests.len()
        };

        if self.fail_all || self.fail_calls.contains(&call) {
            Err(PersistError::Status {
                status: 500,
                body: format!("call {} rejected", call),
            })
        } else {
            Ok(PersistAck {
                body: serde_json::json!({ "id": call }),
            })
        }
    }
}
