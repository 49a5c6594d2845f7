use std::ops::Range;

use crate::core::output;
use crate::domain::model::{ExtractedMedia, MediaKind, WriteSummary};
use crate::domain::ports::Storage;

/// JPEG start-of-image marker.
pub const JPEG_FILE_START: [u8; 2] = [0xFF, 0xD8];
/// JPEG end-of-image marker.
pub const JPEG_FILE_END: [u8; 2] = [0xFF, 0xD9];

fn find_marker(data: &[u8], marker: &[u8; 2], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(marker.len())
        .position(|window| window == marker)
        .map(|pos| from + pos)
}

/// Scans a thumbnail cache blob for embedded JPEG images.
///
/// Returns the byte ranges of each image, start and end marker
/// included, in the order they appear. Ranges never overlap; the scan
/// resumes after each end marker. A start marker with no matching end
/// marker ends the scan with a warning instead of producing a
/// truncated image.
pub fn scan_jpeg_segments(data: &[u8]) -> Vec<Range<usize>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    while let Some(start) = find_marker(data, &JPEG_FILE_START, cursor) {
        match find_marker(data, &JPEG_FILE_END, start + JPEG_FILE_START.len()) {
            Some(eoi) => {
                let end = eoi + JPEG_FILE_END.len();
                tracing::debug!("Found JPEG segment at bytes {}..{}", start, end);
                segments.push(start..end);
                cursor = end;
            }
            None => {
                tracing::warn!(
                    "Start marker at byte {} has no end marker; ignoring trailing data",
                    start
                );
                break;
            }
        }
    }

    segments
}

/// Carves every complete JPEG out of the blob.
pub fn carve(data: &[u8]) -> Vec<ExtractedMedia> {
    scan_jpeg_segments(data)
        .into_iter()
        .map(|range| ExtractedMedia::new(MediaKind::Jpeg, data[range].to_vec()))
        .collect()
}

/// Carves a blob and writes the results as numbered files.
pub async fn extract_to_storage<S: Storage>(
    data: &[u8],
    storage: &S,
    dry_run: bool,
) -> WriteSummary {
    let images = carve(data);
    tracing::info!("Found {} embedded JPEG image(s) ..", images.len());
    output::write_all(storage, &images, dry_run).await
}
