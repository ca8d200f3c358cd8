// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! User-facing status notices.
//!
//! One notice is shown at a time. Success and info notices dismiss
//! themselves after a fixed delay; errors stay until acknowledged.

use crate::models::annotation::LocalId;
use crate::save::SaveOutcome;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Loading,
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Per-annotation failure lines.
    pub details: Vec<String>,
    posted_at: Instant,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
            posted_at: Instant::now(),
        }
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Loading, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Build the notice for a save outcome. `label_of` names an annotation
    /// in the failure details.
    pub fn for_outcome<F>(outcome: &SaveOutcome, label_of: F) -> Self
    where
        F: Fn(&LocalId) -> Option<String>,
    {
        let describe = |failed: &[(LocalId, String)]| -> Vec<String> {
            failed
                .iter()
                .map(|(id, reason)| {
                    let name = label_of(id).unwrap_or_else(|| id.to_string());
                    format!("{}: {}", name, reason)
                })
                .collect()
        };

        match outcome {
            SaveOutcome::NothingToSave => Self::info(outcome.summary()),
            SaveOutcome::AllSaved { .. } => Self::success(outcome.summary()),
            SaveOutcome::PartialFailure { failed, .. } => {
                Self::error(outcome.summary()).with_details(describe(failed))
            }
            SaveOutcome::TotalFailure { failed, .. } => {
                Self::error("Failed to save annotations. Please try again.").with_details(describe(failed))
            }
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self.kind, NoticeKind::Info | NoticeKind::Success)
    }

    pub fn needs_acknowledgement(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    /// Transient notice waiting for an error to be acknowledged.
    queued: Option<Notice>,
    dismiss_after: Duration,
}

impl NoticeBoard {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            current: None,
            queued: None,
            dismiss_after,
        }
    }

    /// Show a notice, replacing the previous one. An error still waiting
    /// for acknowledgement is not replaced by an info or success notice;
    /// the latest such notice is held back until the error is dismissed.
    pub fn post(&mut self, notice: Notice) {
        let blocked = notice.is_transient()
            && self.current.as_ref().is_some_and(Notice::needs_acknowledgement);
        if blocked {
            self.queued = Some(notice);
        } else {
            self.queued = None;
            self.current = Some(notice);
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Drop a transient notice whose display time is over.
    pub fn tick(&mut self, now: Instant) {
        let expired = self.current.as_ref().is_some_and(|n| {
            n.is_transient() && now.saturating_duration_since(n.posted_at) >= self.dismiss_after
        });
        if expired {
            self.current = None;
        }
    }

    /// Time left before the current notice dismisses itself.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.current
            .as_ref()
            .filter(|n| n.is_transient())
            .map(|n| self.dismiss_after.saturating_sub(now.saturating_duration_since(n.posted_at)))
    }

    /// Dismiss the current notice at the user's request and bring up any
    /// notice held back behind it.
    pub fn acknowledge(&mut self) {
        if self.current.as_ref().is_some_and(|n| n.kind != NoticeKind::Loading) {
            self.current = self.queued.take().map(|mut n| {
                n.posted_at = Instant::now();
                n
            });
        }
    }

    pub fn clear_loading(&mut self) {
        if self.current.as_ref().is_some_and(|n| n.kind == NoticeKind::Loading) {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_dismisses_after_delay() {
        let mut board = NoticeBoard::new(Duration::from_secs(3));
        board.post(Notice::success("Saved"));
        let posted = Instant::now();

        board.tick(posted);
        assert!(board.current().is_some());

        board.tick(posted + Duration::from_secs(4));
        assert!(board.current().is_none());
    }

    #[test]
    fn test_errors_wait_for_acknowledgement() {
        let mut board = NoticeBoard::new(Duration::from_secs(3));
        board.post(Notice::error("Failed"));
        board.tick(Instant::now() + Duration::from_secs(60));
        assert!(board.current().is_some_and(Notice::needs_acknowledgement));
        assert_eq!(board.remaining(Instant::now()), None);

        board.acknowledge();
        assert!(board.current().is_none());
    }

    #[test]
    fn test_save_failure_survives_later_info() {
        let mut board = NoticeBoard::new(Duration::from_secs(3));
        let partial = SaveOutcome::PartialFailure {
            succeeded: vec![LocalId::generate()],
            failed: vec![(LocalId::generate(), "status 500".to_string())],
        };
        board.post(Notice::for_outcome(&partial, |_| None));
        board.post(Notice::info("Box discarded: annotation has zero area (0 x 30)"));
        board.post(Notice::success("Saved 1 annotation(s) successfully."));
        board.tick(Instant::now() + Duration::from_secs(4));

        assert!(board.current().is_some_and(Notice::needs_acknowledgement));

        board.acknowledge();
        let shown = board.current().map(|n| (n.kind, n.message.clone()));
        assert_eq!(
            shown,
            Some((NoticeKind::Success, "Saved 1 annotation(s) successfully.".to_string()))
        );

        board.tick(Instant::now() + Duration::from_secs(4));
        assert!(board.current().is_none());
    }

    #[test]
    fn test_errors_and_loading_replace_errors() {
        let mut board = NoticeBoard::new(Duration::from_secs(3));
        board.post(Notice::error("first"));
        board.post(Notice::error("second"));
        assert_eq!(board.current().map(|n| n.message.as_str()), Some("second"));

        board.post(Notice::loading("Saving annotations..."));
        assert_eq!(board.current().map(|n| n.kind), Some(NoticeKind::Loading));
    }

    #[test]
    fn test_loading_is_cleared_explicitly() {
        let mut board = NoticeBoard::new(Duration::from_secs(3));
        board.post(Notice::loading("Loading..."));
        board.acknowledge();
        board.tick(Instant::now() + Duration::from_secs(60));
        assert!(board.current().is_some());

        board.clear_loading();
        assert!(board.current().is_none());
    }

    #[test]
    fn test_outcome_notices() {
        let ok = Notice::for_outcome(&SaveOutcome::AllSaved { saved: vec![LocalId::generate()] }, |_| None);
        assert_eq!(ok.kind, NoticeKind::Success);

        let nothing = Notice::for_outcome(&SaveOutcome::NothingToSave, |_| None);
        assert_eq!(nothing.kind, NoticeKind::Info);
        assert_eq!(nothing.message, "No annotations to save.");

        let failed_id = LocalId::generate();
        let partial = SaveOutcome::PartialFailure {
            succeeded: vec![LocalId::generate()],
            failed: vec![(failed_id.clone(), "status 500".to_string())],
        };
        let notice = Notice::for_outcome(&partial, |id| (id == &failed_id).then(|| "cat".to_string()));
        assert!(notice.needs_acknowledgement());
        assert_eq!(notice.details, vec!["cat: status 500".to_string()]);
    }
}
