// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Status bar showing the current notice.

use crate::status::{Notice, NoticeKind};

/// Display the notice, if any. Returns `true` when the user dismissed it.
pub fn show(ui: &mut egui::Ui, notice: Option<&Notice>) -> bool {
    let mut dismissed = false;

    let Some(notice) = notice else {
        ui.label(egui::RichText::new("Ready").weak());
        return dismissed;
    };

    let color = match notice.kind {
        NoticeKind::Loading | NoticeKind::Info => egui::Color32::from_gray(200),
        NoticeKind::Success => egui::Color32::GREEN,
        NoticeKind::Error => egui::Color32::RED,
    };

    ui.horizontal(|ui| {
        if notice.kind == NoticeKind::Loading {
            ui.spinner();
        }
        ui.label(egui::RichText::new(&notice.message).color(color));
        if notice.needs_acknowledgement() && ui.button("Dismiss").clicked() {
            dismissed = true;
        }
    });

    for line in &notice.details {
        ui.label(egui::RichText::new(line).color(color).small());
    }

    dismissed
}
