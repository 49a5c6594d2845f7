pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, VisionConfig};
pub use core::vision::VisionClient;
pub use utils::error::{MediaError, Result};
