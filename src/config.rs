// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.

use crate::io::serialization;
use crate::save::RetryPolicy;
use anyhow::{ensure, Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "boxmark.yaml";

/// Environment variable overriding the backend address.
pub const API_URL_ENV: &str = "BOXMARK_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub images_path: String,
    pub annotations_path: String,
    pub request_timeout_secs: u64,
    /// How long success notices stay on screen.
    pub notice_dismiss_secs: u64,
    pub retry_policy: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            images_path: "/api/images".to_string(),
            annotations_path: "/api/annotations/".to_string(),
            request_timeout_secs: 10,
            notice_dismiss_secs: 3,
            retry_policy: RetryPolicy::SkipSaved,
        }
    }
}

impl AppConfig {
    /// Load settings from `path`, or from [`DEFAULT_CONFIG_FILE`] if it
    /// exists, or fall back to defaults. [`API_URL_ENV`] wins over the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if default_path.exists() => Self::from_file(default_path)?,
            None => Self::default(),
        };

        config.apply_api_url_override(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = serialization::import_file(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    fn apply_api_url_override(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            log::info!("Using backend address from {}: {}", API_URL_ENV, url);
            self.api_base_url = url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url()?;
        ensure!(
            matches!(url.scheme(), "http" | "https") && url.has_host(),
            "api_base_url must be an absolute http(s) address, got {}",
            self.api_base_url
        );
        ensure!(self.request_timeout_secs > 0, "request_timeout_secs must be positive");
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.api_base_url)
            .with_context(|| format!("Invalid api_base_url: {}", self.api_base_url))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notice_dismiss_after(&self) -> Duration {
        Duration::from_secs(self.notice_dismiss_secs)
    }
}
