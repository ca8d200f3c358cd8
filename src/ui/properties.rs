// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation properties panel.
//!
//! This module provides the side panel where the shape being drawn gets
//! its label, and where the committed annotations of the current image
//! are listed with their save status.

use crate::models::annotation::{CommittedAnnotation, DraftAnnotation, SaveStatus};

pub enum PropertiesAction {
    None,
    CommitDraft,
    CancelDraft,
}

/// Display the properties panel.
///
/// `label_input` is the text field buffer for the draft label.
pub fn show(
    ui: &mut egui::Ui,
    draft: Option<&DraftAnnotation>,
    label_input: &mut String,
    annotations: &[CommittedAnnotation],
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("New annotation");
    ui.separator();

    match draft {
        Some(draft) => {
            let g = &draft.geometry;
            ui.label(format!(
                "x {:.1}  y {:.1}  w {:.1}  h {:.1}",
                g.x, g.y, g.width, g.height
            ));

            let response = ui.add(
                egui::TextEdit::singleline(label_input).hint_text("Label"),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                action = PropertiesAction::CommitDraft;
            }

            ui.horizontal(|ui| {
                let has_label = !label_input.trim().is_empty();
                if ui.add_enabled(has_label, egui::Button::new("Commit")).clicked() {
                    action = PropertiesAction::CommitDraft;
                }
                if ui.button("Cancel").clicked() {
                    action = PropertiesAction::CancelDraft;
                }
            });
        }
        None => {
            ui.label(egui::RichText::new("Drag on the image to draw a box").italics().weak());
        }
    }

    ui.add_space(12.0);
    ui.heading(format!("Annotations ({})", annotations.len()));
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for annotation in annotations {
            ui.horizontal(|ui| {
                let (icon, color) = match &annotation.status {
                    SaveStatus::Unsaved => ("○", egui::Color32::YELLOW),
                    SaveStatus::Saving => ("…", egui::Color32::LIGHT_BLUE),
                    SaveStatus::Saved => ("✔", egui::Color32::GREEN),
                    SaveStatus::Failed(_) => ("✖", egui::Color32::RED),
                };
                ui.label(egui::RichText::new(icon).color(color))
                    .on_hover_text(annotation.status.to_string());
                ui.label(annotation.label());
            });
        }
    });

    action
}
