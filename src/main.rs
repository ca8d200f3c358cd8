// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Boxmark - bounding-box labelling client
//!
//! A desktop application for stepping through the images served by an
//! annotation backend, drawing labelled rectangles on each of them and
//! saving those annotations back to the server.

mod app;
mod config;
mod error;
mod io;
mod models;
mod save;
mod status;
mod ui;
mod util;

use anyhow::Result;
use app::BoxmarkApp;
use config::AppConfig;
use io::http::HttpRepository;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Optional settings file as the first argument
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;
    log::info!("Using backend at {}", config.api_base_url);

    let repository = Arc::new(HttpRepository::new(&config)?);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Boxmark - Image Annotation Tool"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Boxmark",
        options,
        Box::new(move |_cc| Ok(Box::new(BoxmarkApp::new(config, repository)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
