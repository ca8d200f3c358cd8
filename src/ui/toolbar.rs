// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Navigation and save toolbar.

use crate::models::session::Session;

pub enum ToolbarAction {
    None,
    Previous,
    Next,
    Save,
}

/// Display the toolbar with the Previous / Next / Save controls.
pub fn show(ui: &mut egui::Ui, session: &Session) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    let navigator = session.navigator();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui
            .add_enabled(navigator.has_previous(), egui::Button::new("◀ Previous"))
            .clicked()
        {
            action = ToolbarAction::Previous;
        }

        if ui
            .add_enabled(navigator.has_next(), egui::Button::new("Next ▶"))
            .clicked()
        {
            action = ToolbarAction::Next;
        }

        ui.separator();

        let save_label = if session.is_saving() { "Saving..." } else { "Save Annotations" };
        if ui
            .add_enabled(session.can_save(), egui::Button::new(save_label))
            .clicked()
        {
            action = ToolbarAction::Save;
        }
        if session.is_saving() {
            ui.spinner();
        }

        ui.separator();

        let position = if navigator.is_empty() {
            "No images".to_string()
        } else {
            format!("Image {} of {}", navigator.cursor() + 1, navigator.len())
        };
        ui.label(position);

        if let Some(image) = session.current() {
            ui.label(egui::RichText::new(&image.url).italics().weak());
        }

        let store = session.store();
        if store.total() > 0 {
            ui.separator();
            ui.label(format!(
                "{} annotation(s) on {} image(s)",
                store.total(),
                store.image_count()
            ));
        }
    });

    action
}
