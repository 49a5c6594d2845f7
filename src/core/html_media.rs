use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;

use crate::core::output;
use crate::domain::model::{ExtractedMedia, MediaKind, WriteSummary};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// Inline JPEG data URI as written by "save page as single file" exports.
/// The payload runs up to the URL-encoded newline that closes the attribute.
const ENCODED_JPEG_PATTERN: &str =
    r#"src="data:image/jpeg;charset=utf-8;base64,([A-Za-z0-9+/=%]+)%0A">"#;
/// Inline PNG data URI; the charset part is optional in the wild.
const ENCODED_PNG_PATTERN: &str = r#"data:image/png(?:;charset=utf-8)?;base64,([A-Za-z0-9+/=%]+)"#;

/// One base64 payload as it appears in the document, before cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEncodedImage {
    pub kind: MediaKind,
    pub payload: String,
}

/// Line-oriented scanner for inline base64 image data.
pub struct EncodedImageScanner {
    jpeg: Regex,
    png: Regex,
}

impl EncodedImageScanner {
    pub fn new() -> Self {
        Self {
            jpeg: Regex::new(ENCODED_JPEG_PATTERN).unwrap(),
            png: Regex::new(ENCODED_PNG_PATTERN).unwrap(),
        }
    }

    /// Collects every encoded image in the document, in line order.
    pub fn scan(&self, html: &str) -> Vec<RawEncodedImage> {
        let mut found = Vec::new();

        for (index, line) in html.lines().enumerate() {
            if let Some(caps) = self.jpeg.captures(line) {
                tracing::debug!("Found base64 encoded jpeg image on line {}", index + 1);
                found.push(RawEncodedImage {
                    kind: MediaKind::Jpeg,
                    payload: caps[1].to_string(),
                });
            }
            if let Some(caps) = self.png.captures(line) {
                tracing::debug!("Found base64 encoded png image on line {}", index + 1);
                found.push(RawEncodedImage {
                    kind: MediaKind::Png,
                    payload: caps[1].to_string(),
                });
            }
        }

        found
    }
}

impl Default for EncodedImageScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips URL-encoded newlines and surrounding whitespace from a payload.
pub fn clean_payload(payload: &str) -> String {
    payload.trim().replace("%0A", "")
}

/// Cleans and decodes one scanned payload into image bytes.
pub fn decode_payload(image: &RawEncodedImage) -> Result<ExtractedMedia> {
    let data = STANDARD.decode(clean_payload(&image.payload))?;
    Ok(ExtractedMedia::new(image.kind, data))
}

/// Decodes scanned payloads and writes them as numbered files.
///
/// Payloads that clean down to nothing are skipped with a warning and
/// payloads that fail to decode are logged and counted; the rest of
/// the batch still gets written.
pub async fn decode_and_write<S: Storage>(
    storage: &S,
    items: &[RawEncodedImage],
    dry_run: bool,
) -> WriteSummary {
    let mut summary = WriteSummary::default();
    let mut decoded = Vec::new();

    for image in items {
        if clean_payload(&image.payload).is_empty() {
            tracing::warn!("Skipping empty {} payload ..", image.kind);
            summary.skipped += 1;
            continue;
        }

        match decode_payload(image) {
            Ok(media) => decoded.push(media),
            Err(e) => {
                tracing::error!("Could not decode {} payload: {}", image.kind, e);
                summary.failed += 1;
            }
        }
    }

    summary.merge(output::write_all(storage, &decoded, dry_run).await);
    summary
}
