// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the annotation session and drives it from the UI.
//! Network work (fetching the image list, downloading an image, running a
//! save batch) happens on background threads that report back over
//! channels, one operation of each kind at a time.

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::io::http::HttpRepository;
use crate::io::media::{self, LoadedImage};
use crate::models::{
    annotation::ShapeKind,
    image::ImageId,
    session::{CommitOutcome, Session},
};
use crate::save::{SaveCoordinator, SaveOutcome, SaveReport};
use crate::status::{Notice, NoticeBoard};
use crate::ui::{canvas, properties, status_bar, toolbar};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;

/// Textures are kept for the current image and this many on either side.
const TEXTURE_RADIUS: usize = 1;

/// A downloaded image uploaded to the GPU.
struct DisplayImage {
    texture: egui::TextureHandle,
    size: (u32, u32),
}

/// Main application state.
pub struct BoxmarkApp {
    config: AppConfig,
    repository: Arc<HttpRepository>,

    /// Session, once the image list has been fetched
    session: Option<Session>,

    /// Why the image list could not be fetched
    fetch_error: Option<String>,

    /// Receiver for the background image list fetch
    session_loader: Option<Receiver<Result<Session, FetchError>>>,

    /// Textures of the current image and its neighbours
    textures: HashMap<ImageId, DisplayImage>,

    /// Images that could not be downloaded or decoded
    broken_images: HashMap<ImageId, String>,

    /// Receiver for the image currently being downloaded
    image_loader: Option<(ImageId, Receiver<anyhow::Result<LoadedImage>>)>,

    /// Receiver for the save batch in flight
    save_worker: Option<Receiver<SaveReport>>,

    notices: NoticeBoard,

    /// Text field buffer for the draft label
    label_input: String,

    /// Corner where the current drag started
    drag_origin: Option<(f64, f64)>,
}

impl BoxmarkApp {
    pub fn new(config: AppConfig, repository: Arc<HttpRepository>) -> Self {
        let notices = NoticeBoard::new(config.notice_dismiss_after());
        let mut app = Self {
            config,
            repository,
            session: None,
            fetch_error: None,
            session_loader: None,
            textures: HashMap::new(),
            broken_images: HashMap::new(),
            image_loader: None,
            save_worker: None,
            notices,
            label_input: String::new(),
            drag_origin: None,
        };
        app.load_session();
        app
    }

    /// Fetch the image list in the background and start a session over it.
    fn load_session(&mut self) {
        let (sender, receiver) = channel();
        self.session_loader = Some(receiver);
        self.fetch_error = None;
        self.notices.post(Notice::loading("Loading images..."));

        let repository = Arc::clone(&self.repository);
        let policy = self.config.retry_policy;
        std::thread::spawn(move || {
            let _ = sender.send(Session::load(repository.as_ref(), policy));
        });
    }

    fn poll_session_loader(&mut self) {
        let Some(receiver) = &self.session_loader else {
            return;
        };

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(FetchError::Transport(
                "image list request stopped unexpectedly".to_string(),
            )),
        };
        self.session_loader = None;
        self.notices.clear_loading();

        match result {
            Ok(session) => {
                if session.current().is_none() {
                    self.notices.post(Notice::info("The server has no images to annotate."));
                }
                self.session = Some(session);
            }
            Err(e) => {
                log::error!("{}", e);
                self.fetch_error = Some(e.to_string());
            }
        }
    }

    /// Start downloading the current image if it is not on hand yet, and
    /// drop textures that are no longer next to the cursor.
    fn ensure_current_image(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let nearby = session.navigator().nearby(TEXTURE_RADIUS);
        let cached = self.textures.len();
        self.textures
            .retain(|id, _| nearby.iter().any(|image| image.id == *id));
        if self.textures.len() < cached {
            log::debug!("Released {} texture(s)", cached - self.textures.len());
        }

        let Some(image) = session.current() else {
            return;
        };
        if self.textures.contains_key(&image.id) || self.broken_images.contains_key(&image.id) {
            return;
        }
        if matches!(&self.image_loader, Some((id, _)) if *id == image.id) {
            return;
        }

        let (sender, receiver) = channel();
        self.image_loader = Some((image.id.clone(), receiver));

        let repository = Arc::clone(&self.repository);
        let url = image.url.clone();
        std::thread::spawn(move || {
            let result = repository
                .fetch_bytes(&url)
                .and_then(|bytes| media::decode_image(&bytes));
            let _ = sender.send(result);
        });
    }

    fn poll_image_loader(&mut self, ctx: &egui::Context) {
        let Some((id, receiver)) = &self.image_loader else {
            return;
        };

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(anyhow::anyhow!("image download stopped unexpectedly")),
        };
        let id = id.clone();
        self.image_loader = None;

        match result {
            Ok(loaded) => {
                let size = [loaded.width as usize, loaded.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                let texture = ctx.load_texture(
                    format!("image-{}", id),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                log::info!("Loaded image {} ({}x{})", id, loaded.width, loaded.height);
                self.textures.insert(
                    id,
                    DisplayImage {
                        texture,
                        size: (loaded.width, loaded.height),
                    },
                );
            }
            Err(e) => {
                log::error!("Failed to load image {}: {:#}", id, e);
                self.broken_images.insert(id, format!("{:#}", e));
            }
        }
    }

    /// Hand the current image's annotations to a background save.
    fn start_save(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.begin_save() {
            Ok(Some(batch)) => {
                if batch.is_empty() {
                    log::info!("Image {}: every annotation is already saved", batch.image());
                } else {
                    log::info!("Saving {} annotation(s) for image {}", batch.len(), batch.image());
                }
                let (sender, receiver) = channel();
                self.save_worker = Some(receiver);
                self.notices.post(Notice::loading("Saving annotations..."));

                let repository = Arc::clone(&self.repository);
                std::thread::spawn(move || {
                    let report = SaveCoordinator::execute(batch, repository.as_ref());
                    let _ = sender.send(report);
                });
            }
            Ok(None) => {
                self.notices
                    .post(Notice::for_outcome(&SaveOutcome::NothingToSave, |_| None));
            }
            Err(e) => log::warn!("Save not started: {}", e),
        }
    }

    fn poll_save_worker(&mut self) {
        let (Some(receiver), Some(session)) = (&self.save_worker, self.session.as_mut()) else {
            return;
        };

        match receiver.try_recv() {
            Ok(report) => {
                self.save_worker = None;
                let image = report.image().clone();
                let outcome = session.finish_save(report);
                let notice = Notice::for_outcome(&outcome, |id| {
                    session.store().get(&image, id).map(|a| a.label().to_string())
                });
                self.notices.post(notice);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.save_worker = None;
                session.abandon_save("save stopped unexpectedly");
                self.notices
                    .post(Notice::error("Failed to save annotations. Please try again."));
            }
        }
    }

    fn commit_draft(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.set_draft_label(self.label_input.clone());
        match session.commit_draft() {
            Ok(CommitOutcome::Committed(_)) => self.label_input.clear(),
            Ok(CommitOutcome::Discarded(reason)) => {
                self.label_input.clear();
                self.notices.post(Notice::info(format!("Box discarded: {}", reason)));
            }
            Err(e) => self.notices.post(Notice::info(format!("Cannot add annotation: {}", e))),
        }
    }

    fn cancel_draft(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if session.cancel_draft().is_some() {
                log::debug!("Cancelled shape");
            }
        }
        self.label_input.clear();
        self.drag_origin = None;
    }

    fn navigate(&mut self, forward: bool) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if forward {
            session.next();
        } else {
            session.previous();
        }
        self.label_input.clear();
        self.drag_origin = None;
    }

    fn handle_canvas(&mut self, action: canvas::CanvasAction) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match action {
            canvas::CanvasAction::BeginShape(geometry) => {
                if let Err(e) = session.begin_draft(geometry, ShapeKind::Rectangle) {
                    log::warn!("Cannot start shape: {}", e);
                }
                self.label_input.clear();
            }
            canvas::CanvasAction::UpdateShape(geometry) => {
                session.update_draft(geometry);
            }
            canvas::CanvasAction::FinishShape => {
                if let Some(draft) = session.draft() {
                    log::debug!("Shape drawn: {:?}", draft.geometry);
                }
            }
            canvas::CanvasAction::None => {}
        }
    }

    /// Full-window view shown until a session exists.
    fn show_startup(&mut self, ctx: &egui::Context) {
        let mut retry = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.heading(
                        egui::RichText::new("Image Annotation Tool")
                            .size(28.0)
                            .color(egui::Color32::from_gray(200)),
                    );
                    ui.add_space(20.0);
                    match &self.fetch_error {
                        Some(error) => {
                            ui.label(egui::RichText::new(error).color(egui::Color32::RED));
                            ui.add_space(10.0);
                            retry = ui.button("Retry").clicked();
                        }
                        None => {
                            ui.spinner();
                            ui.label("Loading...");
                        }
                    }
                });
            });
        });

        if retry {
            self.load_session();
        }
    }
}

impl eframe::App for BoxmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_session_loader();
        self.poll_image_loader(ctx);
        self.poll_save_worker();
        self.ensure_current_image();

        let now = Instant::now();
        self.notices.tick(now);

        // Keep repainting while background work or a timed notice is pending
        if self.session_loader.is_some() || self.image_loader.is_some() || self.save_worker.is_some() {
            ctx.request_repaint();
        } else if let Some(remaining) = self.notices.remaining(now) {
            ctx.request_repaint_after(remaining);
        }

        if self.session.is_none() {
            self.show_startup(ctx);
            return;
        }

        // Keyboard shortcuts
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.cancel_draft();
        }
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
                self.navigate(true);
            } else if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
                self.navigate(false);
            }
        }

        let Some(session) = self.session.as_ref() else {
            return;
        };

        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, session))
            .inner;

        let dismissed = egui::TopBottomPanel::bottom("status_bar")
            .show(ctx, |ui| status_bar::show(ui, self.notices.current()))
            .inner;

        let label_input = &mut self.label_input;
        let properties_action = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| {
                properties::show(ui, session.draft(), label_input, session.current_annotations())
            })
            .inner;

        let current = session.current();
        let display = current.and_then(|image| self.textures.get(&image.id));
        let broken = current.and_then(|image| self.broken_images.get(&image.id));
        let drag_origin = &mut self.drag_origin;

        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| match (current, broken) {
                (None, _) => {
                    ui.centered_and_justified(|ui| ui.label("No images to annotate."));
                    canvas::CanvasAction::None
                }
                (Some(image), Some(error)) => {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            egui::RichText::new(format!("Cannot display {}: {}", image.url, error))
                                .color(egui::Color32::RED),
                        )
                    });
                    canvas::CanvasAction::None
                }
                (Some(_), None) => canvas::show(
                    ui,
                    display.map(|d| &d.texture),
                    display.map(|d| d.size),
                    session.current_annotations(),
                    session.draft(),
                    drag_origin,
                ),
            })
            .inner;

        if dismissed {
            self.notices.acknowledge();
        }

        match toolbar_action {
            toolbar::ToolbarAction::Previous => self.navigate(false),
            toolbar::ToolbarAction::Next => self.navigate(true),
            toolbar::ToolbarAction::Save => self.start_save(),
            toolbar::ToolbarAction::None => {}
        }

        match properties_action {
            properties::PropertiesAction::CommitDraft => self.commit_draft(),
            properties::PropertiesAction::CancelDraft => self.cancel_draft(),
            properties::PropertiesAction::None => {}
        }

        self.handle_canvas(canvas_action);
    }
}
