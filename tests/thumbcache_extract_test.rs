use anyhow::Result;
use mediabag::core::thumbcache::{self, JPEG_FILE_END, JPEG_FILE_START};
use mediabag::LocalStorage;
use tempfile::TempDir;

fn fake_jpeg(body: &[u8]) -> Vec<u8> {
    let mut data = JPEG_FILE_START.to_vec();
    data.extend_from_slice(body);
    data.extend_from_slice(&JPEG_FILE_END);
    data
}

fn storage_for(temp_dir: &TempDir) -> LocalStorage {
    LocalStorage::new(temp_dir.path().to_string_lossy().to_string())
}

#[tokio::test]
async fn test_extracts_numbered_files_from_blob() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = storage_for(&temp_dir);

    let first = fake_jpeg(b"first");
    let second = fake_jpeg(b"second image");
    let mut blob = vec![0u8; 32];
    blob.extend_from_slice(&first);
    blob.extend_from_slice(&[0xAB; 7]);
    blob.extend_from_slice(&second);

    let summary = thumbcache::extract_to_storage(&blob, &storage, false).await;

    assert_eq!(summary.written, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        std::fs::read(temp_dir.path().join("extracted_0000.jpg"))?,
        first
    );
    assert_eq!(
        std::fs::read(temp_dir.path().join("extracted_0001.jpg"))?,
        second
    );
    Ok(())
}

#[tokio::test]
async fn test_numbering_continues_across_runs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = storage_for(&temp_dir);

    let first = fake_jpeg(b"run one");
    thumbcache::extract_to_storage(&first, &storage, false).await;

    // 第二輪不能覆寫第一輪的輸出
    let second = fake_jpeg(b"run two");
    let summary = thumbcache::extract_to_storage(&second, &storage, false).await;

    assert_eq!(summary.written, 1);
    assert_eq!(
        std::fs::read(temp_dir.path().join("extracted_0000.jpg"))?,
        first
    );
    assert_eq!(
        std::fs::read(temp_dir.path().join("extracted_0001.jpg"))?,
        second
    );
    Ok(())
}

#[tokio::test]
async fn test_dry_run_leaves_directory_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = storage_for(&temp_dir);

    let blob = fake_jpeg(b"not written");
    let summary = thumbcache::extract_to_storage(&blob, &storage, true).await;

    assert_eq!(summary.written, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_blob_without_markers_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = storage_for(&temp_dir);

    let summary = thumbcache::extract_to_storage(&[0u8; 256], &storage, false).await;

    assert_eq!(summary.written, 0);
    assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 0);
    Ok(())
}
