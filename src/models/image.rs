// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Images served by the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identity of an image. The server may use integers or strings;
/// the form the server used is kept so it round-trips unchanged in persist requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageId::Number(n) => write!(f, "{}", n),
            ImageId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ImageId {
    fn from(n: i64) -> Self {
        ImageId::Number(n)
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        ImageId::Text(s.to_string())
    }
}

/// One image in the review sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    #[serde(rename = "image_url", alias = "url")]
    pub url: String,
}

#[cfg(test)]
impl Image {
    pub fn new(id: impl Into<ImageId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_backend_listing() {
        let json = r#"[{"id": 1, "image_url": "a.png"}, {"id": "b-2", "url": "b.png"}]"#;
        let images: Vec<Image> = serde_json::from_str(json).unwrap();
        assert_eq!(images[0], Image::new(1, "a.png"));
        assert_eq!(images[1], Image::new("b-2", "b.png"));
    }

    #[test]
    fn test_id_keeps_its_json_form() {
        assert_eq!(serde_json::to_value(ImageId::Number(7)).unwrap(), serde_json::json!(7));
        assert_eq!(serde_json::to_value(ImageId::from("x")).unwrap(), serde_json::json!("x"));
        assert_eq!(ImageId::Number(7).to_string(), "7");
    }
}
