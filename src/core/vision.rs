//! Client for the cloud vision "describe image" endpoint.
//!
//! Sends raw image bytes and gets back caption candidates with
//! confidence scores.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::utils::error::{MediaError, Result};

/// Describe endpoint queried when no other is configured.
pub const DEFAULT_ENDPOINT: &str =
    "https://westus.api.cognitive.microsoft.com/vision/v1.0/describe";
/// Header carrying the subscription key.
pub const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
/// Environment variable consulted when no key is given on the command line.
pub const API_KEY_ENV: &str = "VISION_API_KEY";
/// Extensions treated as uploadable images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// HTTP client for the image description endpoint.
pub struct VisionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_candidates: usize,
}

/// Parsed describe response.
#[derive(Debug, Deserialize)]
pub struct DescribeResponse {
    pub description: Description,
    #[serde(rename = "requestId")]
    pub request_id: Option<String>,
    pub metadata: Option<ImageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub captions: Vec<Caption>,
}

/// One caption candidate with the service's confidence in it.
#[derive(Debug, Clone, Deserialize)]
pub struct Caption {
    pub text: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ImageMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
}

impl DescribeResponse {
    /// Text of the highest-ranked caption, if the service produced one.
    pub fn caption(&self) -> Option<&str> {
        self.description.captions.first().map(|c| c.text.as_str())
    }
}

impl VisionClient {
    pub fn new(endpoint: String, api_key: String, max_candidates: usize) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, api_key, max_candidates)
    }

    /// Reuses an existing [`reqwest::Client`], e.g. for connection pooling.
    pub fn with_client(
        client: reqwest::Client,
        endpoint: String,
        api_key: String,
        max_candidates: usize,
    ) -> Self {
        Self {
            client,
            endpoint,
            api_key,
            max_candidates,
        }
    }

    fn request(&self, image: Vec<u8>) -> reqwest::RequestBuilder {
        self.client
            .post(&self.endpoint)
            .query(&[("maxCandidates", self.max_candidates.to_string())])
            .header("Content-Type", "application/octet-stream")
            .header(API_KEY_HEADER, &self.api_key)
            .body(image)
    }

    /// Describes raw image bytes.
    pub async fn describe(&self, image: Vec<u8>) -> Result<DescribeResponse> {
        let response = self.request(image).send().await?;
        Self::parse_response(response).await
    }

    /// Describes raw image bytes, returning the service's JSON verbatim.
    pub async fn describe_raw(&self, image: Vec<u8>) -> Result<serde_json::Value> {
        let response = self.request(image).send().await?;
        Self::parse_response(response).await
    }

    /// Reads an image file and describes it.
    pub async fn describe_file(&self, path: &Path) -> Result<DescribeResponse> {
        let image = tokio::fs::read(path).await?;
        self.describe(image).await
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(MediaError::ApiFailure {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Expands files and directories into a flat list of image paths.
/// Directories are listed one level deep; nothing recurses.
pub fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_dir() {
            match std::fs::read_dir(path) {
                Ok(entries) => {
                    let mut found: Vec<PathBuf> = entries
                        .flatten()
                        .map(|entry| entry.path())
                        .filter(|p| p.is_file() && has_image_extension(p))
                        .collect();
                    found.sort();
                    images.extend(found);
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping unreadable directory \"{}\": {}",
                        path.display(),
                        e
                    );
                }
            }
        } else if path.is_file() && has_image_extension(path) {
            images.push(path.clone());
        } else {
            tracing::warn!(
                "Skipping \"{}\": not a supported image file",
                path.display()
            );
        }
    }

    images
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
