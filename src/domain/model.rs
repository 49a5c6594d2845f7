use serde::{Deserialize, Serialize};

/// Image formats the extractors know how to carve out and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Jpeg,
    Png,
}

impl MediaKind {
    /// File extension used when writing extracted output.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Jpeg => "jpg",
            MediaKind::Png => "png",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Jpeg => write!(f, "jpeg"),
            MediaKind::Png => write!(f, "png"),
        }
    }
}

/// A single embedded image recovered from a container (thumbnail cache blob,
/// HTML document, ...), not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMedia {
    pub kind: MediaKind,
    pub data: Vec<u8>,
}

impl ExtractedMedia {
    pub fn new(kind: MediaKind, data: Vec<u8>) -> Self {
        Self { kind, data }
    }
}

/// Counters reported after writing a batch of extracted files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl WriteSummary {
    /// Folds another batch's counters into this one.
    pub fn merge(&mut self, other: WriteSummary) {
        self.written += other.written;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}
