pub mod cli;
pub mod vision;

pub use vision::VisionConfig;
