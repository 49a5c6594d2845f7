use crate::utils::error::Result;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// External media player used to preview a video before tagging it.
pub trait VideoPlayer: Send + Sync {
    fn play(&self, path: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
}
