// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and annotation.
//!
//! This module shows the current image with its committed rectangles and
//! turns pointer drags into geometry updates for the draft shape.

use crate::models::annotation::{CommittedAnnotation, DraftAnnotation, Geometry, SaveStatus};
use crate::util::geometry::{fit_size, from_percent, to_percent};

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    BeginShape(Geometry),
    UpdateShape(Geometry),
    FinishShape,
}

/// Display the main canvas area and handle mouse interactions.
///
/// `drag_origin` holds the corner where the current drag started, in
/// percent coordinates.
pub fn show(
    ui: &mut egui::Ui,
    image_texture: Option<&egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
    annotations: &[CommittedAnnotation],
    draft: Option<&DraftAnnotation>,
    drag_origin: &mut Option<(f64, f64)>,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(texture), Some((img_width, img_height))) = (image_texture, image_size) else {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        };

        let available = ui.available_size();
        let (display_width, display_height) = fit_size(img_width, img_height, available.x, available.y);

        // Center the image
        let x_offset = (available.x - display_width) / 2.0;
        let y_offset = (available.y - display_height) / 2.0;
        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let response = ui.allocate_rect(image_rect, egui::Sense::drag());
        let to_image = |pos: egui::Pos2| {
            to_percent(
                (pos.x - image_rect.min.x) as f64,
                (pos.y - image_rect.min.y) as f64,
                display_width as f64,
                display_height as f64,
            )
        };
        let pointer = response.interact_pointer_pos().map(to_image);

        if response.drag_started() {
            // A drag is only reported once the pointer has moved; start the
            // box where the button went down.
            let press_origin = ui.input(|i| i.pointer.press_origin()).map(to_image);
            if let Some((x, y)) = press_origin.or(pointer) {
                *drag_origin = Some((x, y));
                action = CanvasAction::BeginShape(Geometry::new(x, y, 0.0, 0.0));
            }
        } else if response.dragged() {
            if let (Some((x0, y0)), Some((x1, y1))) = (*drag_origin, pointer) {
                action = CanvasAction::UpdateShape(Geometry::from_corners(x0, y0, x1, y1));
            }
        } else if response.drag_stopped() && drag_origin.take().is_some() {
            action = CanvasAction::FinishShape;
        }

        let painter = ui.painter();
        for annotation in annotations {
            draw_rect(
                painter,
                annotation.geometry(),
                Some(annotation.label()),
                &image_rect,
                status_color(&annotation.status),
            );
        }

        if let Some(draft) = draft {
            let label = draft.trimmed_label();
            draw_rect(painter, &draft.geometry, label, &image_rect, egui::Color32::LIGHT_BLUE);
        }
    });

    action
}

fn status_color(status: &SaveStatus) -> egui::Color32 {
    match status {
        SaveStatus::Unsaved => egui::Color32::YELLOW,
        SaveStatus::Saving => egui::Color32::LIGHT_BLUE,
        SaveStatus::Saved => egui::Color32::GREEN,
        SaveStatus::Failed(_) => egui::Color32::RED,
    }
}

/// Draw a rectangle with an optional label above its top-left corner.
fn draw_rect(
    painter: &egui::Painter,
    geometry: &Geometry,
    label: Option<&str>,
    image_rect: &egui::Rect,
    color: egui::Color32,
) {
    let (x, y, w, h) = from_percent(geometry, image_rect.width() as f64, image_rect.height() as f64);
    let rect = egui::Rect::from_min_size(
        image_rect.min + egui::vec2(x as f32, y as f32),
        egui::vec2(w as f32, h as f32),
    );

    painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, color));

    if let Some(label) = label {
        painter.text(
            rect.left_top() - egui::vec2(0.0, 2.0),
            egui::Align2::LEFT_BOTTOM,
            label,
            egui::FontId::proportional(14.0),
            color,
        );
    }
}
