pub mod exif;
pub mod html_media;
pub mod output;
pub mod rotation;
pub mod thumbcache;
pub mod vision;

pub use crate::domain::model::{ExtractedMedia, MediaKind, WriteSummary};
pub use crate::domain::ports::{Storage, VideoPlayer};
pub use crate::utils::error::Result;
