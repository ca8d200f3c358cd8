// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! HTTP/JSON backend adapter.
//!
//! Blocking client; callers keep it off the UI thread. Transport errors are
//! turned into [`FetchError`]/[`PersistError`] here and go no further.

use super::repository::{AnnotationRepository, ImageRepository, PersistAck, PersistRequest};
use crate::config::AppConfig;
use crate::error::{FetchError, PersistError};
use crate::models::image::Image;
use anyhow::{ensure, Context, Result};
use reqwest::Url;
use serde_json::Value;

pub struct HttpRepository {
    base_url: Url,
    images_url: Url,
    annotations_url: Url,
    client: reqwest::blocking::Client,
}

impl HttpRepository {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let images_url = endpoint(&config.api_base_url, &config.images_path)?;
        let annotations_url = endpoint(&config.api_base_url, &config.annotations_path)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            images_url,
            annotations_url,
            client,
        })
    }

    #[cfg(test)]
    pub fn images_url(&self) -> &Url {
        &self.images_url
    }

    #[cfg(test)]
    pub fn annotations_url(&self) -> &Url {
        &self.annotations_url
    }

    /// Resolve an image URL as served by the backend; relative URLs are
    /// taken relative to the base address.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        self.base_url
            .join(url)
            .with_context(|| format!("Invalid image URL: {}", url))
    }

    /// Download the raw bytes behind an image URL.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let url = self.resolve(url)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("Failed to request {}", url))?;

        let status = response.status();
        ensure!(status.is_success(), "{} responded with status {}", url, status.as_u16());

        let bytes = response
            .bytes()
            .with_context(|| format!("Failed to read {}", url))?;
        Ok(bytes.to_vec())
    }
}

/// Join a base address and an endpoint path, keeping any path prefix of the base.
fn endpoint(base: &str, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).with_context(|| format!("Invalid endpoint address: {}", joined))
}

impl ImageRepository for HttpRepository {
    fn fetch_images(&self) -> Result<Vec<Image>, FetchError> {
        log::debug!("GET {}", self.images_url);
        let response = self
            .client
            .get(self.images_url.clone())
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Vec<Image>>()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl AnnotationRepository for HttpRepository {
    fn persist_annotation(&self, request: &PersistRequest) -> Result<PersistAck, PersistError> {
        log::debug!("POST {}", self.annotations_url);
        let response = self
            .client
            .post(self.annotations_url.clone())
            .json(request)
            .send()
            .map_err(|e| PersistError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| PersistError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(PersistError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(PersistAck {
            body: parse_body(text),
        })
    }
}

fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::image::ImageId;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    /// Answer exactly one request on a loopback port. The handle yields
    /// the raw request as received.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                request.push_str(&line);
                if line == "\r\n" {
                    break;
                }
            }
            let mut payload = vec![0; content_length];
            reader.read_exact(&mut payload).unwrap();
            request.push_str(&String::from_utf8_lossy(&payload));

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });

        (base, handle)
    }

    /// Repository pointed at `base`, bypassing any proxy set in the environment.
    fn repository_at(base: &str) -> HttpRepository {
        let config = AppConfig {
            api_base_url: base.to_string(),
            ..AppConfig::default()
        };
        let mut repo = HttpRepository::new(&config).unwrap();
        repo.client = reqwest::blocking::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        repo
    }

    fn cat_request() -> PersistRequest {
        PersistRequest {
            image: ImageId::Number(1),
            label: "cat".to_string(),
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
        }
    }

    /// An address nothing listens on.
    fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        base
    }

    #[test]
    fn test_fetch_images_decodes_listing() {
        let (base, server) = serve_once("200 OK", r#"[{"id": 1, "image_url": "/media/a.png"}]"#);
        let images = repository_at(&base).fetch_images().unwrap();

        assert_eq!(images, vec![Image::new(1, "/media/a.png")]);
        assert!(server.join().unwrap().starts_with("GET /api/images "));
    }

    #[test]
    fn test_fetch_images_reports_status() {
        let (base, server) = serve_once("503 Service Unavailable", "");
        let result = repository_at(&base).fetch_images();

        assert_eq!(result, Err(FetchError::Status(503)));
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_images_rejects_unexpected_body() {
        let (base, server) = serve_once("200 OK", r#"{"images": "none"}"#);
        let result = repository_at(&base).fetch_images();

        assert!(matches!(result, Err(FetchError::Decode(_))), "got {:?}", result);
        server.join().unwrap();
    }

    #[test]
    fn test_persist_returns_server_ack() {
        let (base, server) = serve_once("201 Created", r#"{"id": 9}"#);
        let ack = repository_at(&base).persist_annotation(&cat_request()).unwrap();

        assert_eq!(ack.body, serde_json::json!({"id": 9}));
        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/annotations/ "));
        assert!(request.contains(r#""label":"cat""#), "{}", request);
    }

    #[test]
    fn test_persist_reports_status_and_body() {
        let (base, server) = serve_once("400 Bad Request", "label required");
        let result = repository_at(&base).persist_annotation(&cat_request());

        assert_eq!(
            result.unwrap_err(),
            PersistError::Status {
                status: 400,
                body: "label required".to_string()
            }
        );
        server.join().unwrap();
    }

    #[test]
    fn test_refused_connection_is_transport_error() {
        let repo = repository_at(&closed_port());

        assert!(matches!(repo.fetch_images(), Err(FetchError::Transport(_))));
        assert!(matches!(
            repo.persist_annotation(&cat_request()),
            Err(PersistError::Transport(_))
        ));
    }

    #[test]
    fn test_endpoints_follow_config() {
        let config = AppConfig {
            api_base_url: "http://127.0.0.1:8000/".to_string(),
            ..AppConfig::default()
        };
        let repo = HttpRepository::new(&config).unwrap();
        assert_eq!(repo.images_url().as_str(), "http://127.0.0.1:8000/api/images");
        assert_eq!(repo.annotations_url().as_str(), "http://127.0.0.1:8000/api/annotations/");
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let url = endpoint("https://example.org/labels", "/api/images").unwrap();
        assert_eq!(url.as_str(), "https://example.org/labels/api/images");
    }

    #[test]
    fn test_resolve_image_urls() {
        let repo = HttpRepository::new(&AppConfig::default()).unwrap();
        assert_eq!(
            repo.resolve("/media/a.png").unwrap().as_str(),
            "http://127.0.0.1:8000/media/a.png"
        );
        assert_eq!(
            repo.resolve("https://cdn.example.org/b.png").unwrap().as_str(),
            "https://cdn.example.org/b.png"
        );
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(String::new()), Value::Null);
        assert_eq!(parse_body(r#"{"id": 4}"#.to_string()), serde_json::json!({"id": 4}));
        assert_eq!(parse_body("created".to_string()), Value::String("created".into()));
    }
}
