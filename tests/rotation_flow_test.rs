use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use mediabag::core::rotation;
use mediabag::domain::ports::VideoPlayer;
use mediabag::MediaError;
use tempfile::TempDir;

/// Records which videos were played instead of launching anything.
struct ScriptedPlayer {
    played: Mutex<Vec<PathBuf>>,
}

impl ScriptedPlayer {
    fn new() -> Self {
        Self {
            played: Mutex::new(Vec::new()),
        }
    }

    fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }
}

impl VideoPlayer for ScriptedPlayer {
    async fn play(&self, path: &Path) -> mediabag::Result<()> {
        self.played.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

struct FailingPlayer;

impl VideoPlayer for FailingPlayer {
    async fn play(&self, _path: &Path) -> mediabag::Result<()> {
        Err(MediaError::ToolFailed {
            tool: "mplayer".to_string(),
            exit_code: Some(1),
            stderr: "cannot open display".to_string(),
        })
    }
}

fn make_video(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"video bytes").unwrap();
    path
}

#[tokio::test]
async fn test_replay_then_tag_renames_video() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let video = make_video(&temp_dir, "holiday.mp4");

    let player = ScriptedPlayer::new();
    // 8 = 重播一次, 2 = 順時針 90 度
    let mut input = Cursor::new(b"8\n2\n".to_vec());
    let mut output = Vec::new();

    let summary =
        rotation::run_session(&[video.clone()], &player, &mut input, &mut output).await?;

    assert_eq!(summary.renamed, 1);
    assert_eq!(summary.skipped, 0);
    assert!(!summary.quit_early);
    assert_eq!(player.play_count(), 2);
    assert!(!video.exists());
    assert!(temp_dir.path().join("todo_90deg_holiday.mp4").exists());

    let text = String::from_utf8(output)?;
    assert!(text.contains("Renaming"));
    Ok(())
}

#[tokio::test]
async fn test_skip_then_quit_leaves_files_alone() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let first = make_video(&temp_dir, "a.mp4");
    let second = make_video(&temp_dir, "b.mp4");

    let player = ScriptedPlayer::new();
    let mut input = Cursor::new(b"7\n9\n".to_vec());
    let mut output = Vec::new();

    let summary = rotation::run_session(
        &[first.clone(), second.clone()],
        &player,
        &mut input,
        &mut output,
    )
    .await?;

    assert_eq!(summary.renamed, 0);
    assert_eq!(summary.skipped, 1);
    assert!(summary.quit_early);
    assert!(first.exists());
    assert!(second.exists());
    Ok(())
}

#[tokio::test]
async fn test_existing_tagged_name_is_not_overwritten() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let video = make_video(&temp_dir, "a.mp4");
    let occupied = temp_dir.path().join("todo_0deg_a.mp4");
    std::fs::write(&occupied, b"earlier result")?;

    let player = ScriptedPlayer::new();
    let mut input = Cursor::new(b"1\n".to_vec());
    let mut output = Vec::new();

    let summary =
        rotation::run_session(&[video.clone()], &player, &mut input, &mut output).await?;

    assert_eq!(summary.renamed, 0);
    assert_eq!(summary.skipped, 1);
    assert!(video.exists());
    assert_eq!(std::fs::read(&occupied)?, b"earlier result".to_vec());

    let text = String::from_utf8(output)?;
    assert!(text.contains("File exists"));
    Ok(())
}

#[tokio::test]
async fn test_player_failure_still_reaches_the_menu() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let video = make_video(&temp_dir, "broken.mp4");

    let mut input = Cursor::new(b"7\n".to_vec());
    let mut output = Vec::new();

    let summary =
        rotation::run_session(&[video.clone()], &FailingPlayer, &mut input, &mut output).await?;

    assert_eq!(summary.skipped, 1);
    assert!(video.exists());

    let text = String::from_utf8(output)?;
    assert!(text.contains("[ERROR]"));
    assert!(text.contains("Please input selection"));
    Ok(())
}

#[tokio::test]
async fn test_end_of_input_quits_the_session() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let video = make_video(&temp_dir, "last.mp4");

    let player = ScriptedPlayer::new();
    let mut input = Cursor::new(Vec::new());
    let mut output = Vec::new();

    let summary =
        rotation::run_session(&[video.clone()], &player, &mut input, &mut output).await?;

    assert!(summary.quit_early);
    assert!(video.exists());
    Ok(())
}
