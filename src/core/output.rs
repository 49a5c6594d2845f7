use crate::domain::model::{ExtractedMedia, WriteSummary};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// Hands out numbered output names, stepping past anything that already
/// exists in the target storage so nothing gets overwritten.
pub struct NumberedWriter<'a, S: Storage> {
    storage: &'a S,
    next_index: usize,
}

impl<'a, S: Storage> NumberedWriter<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self {
            storage,
            next_index: 0,
        }
    }

    fn format_filename(index: usize, extension: &str) -> String {
        format!("extracted_{:04}.{}", index, extension)
    }

    /// First unused name for this extension. The counter only moves
    /// forward, so names stay monotonic across a whole run.
    async fn next_free_name(&mut self, extension: &str) -> String {
        let mut name = Self::format_filename(self.next_index, extension);
        while self.storage.exists(&name).await {
            tracing::debug!("Output name taken: \"{}\"", name);
            self.next_index += 1;
            name = Self::format_filename(self.next_index, extension);
        }
        name
    }

    /// Writes one item under the next free numbered name and returns
    /// the name actually used.
    pub async fn write(&mut self, media: &ExtractedMedia) -> Result<String> {
        let name = self.next_free_name(media.kind.extension()).await;
        self.storage.write_file(&name, &media.data).await?;
        self.next_index += 1;
        Ok(name)
    }
}

/// Writes a batch of extracted media as numbered files.
///
/// Empty payloads are skipped with a warning and individual write
/// failures are logged and counted; neither aborts the batch. In
/// dry-run mode the would-be writes are logged instead of performed.
pub async fn write_all<S: Storage>(
    storage: &S,
    items: &[ExtractedMedia],
    dry_run: bool,
) -> WriteSummary {
    let mut writer = NumberedWriter::new(storage);
    let mut summary = WriteSummary::default();

    for media in items {
        if media.data.is_empty() {
            tracing::warn!("Skipping empty {} payload ..", media.kind);
            summary.skipped += 1;
            continue;
        }

        if dry_run {
            let name = writer.next_free_name(media.kind.extension()).await;
            tracing::info!(
                "[--dry-run] Would have written {} bytes to file \"{}\" ..",
                media.data.len(),
                name
            );
            writer.next_index += 1;
            continue;
        }

        match writer.write(media).await {
            Ok(name) => {
                tracing::info!("Wrote {} bytes to file \"{}\" ..", media.data.len(), name);
                summary.written += 1;
            }
            Err(e) => {
                tracing::error!("Write operation failed: {}", e);
                summary.failed += 1;
            }
        }
    }

    summary
}
