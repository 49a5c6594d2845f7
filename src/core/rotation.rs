use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::domain::ports::VideoPlayer;
use crate::utils::error::{MediaError, Result};

/// Prefix marking a video as already tagged; tagged files are never
/// offered again.
pub const TAG_PREFIX: &str = "todo_";

/// Rotation the user decided a video needs. The variants map onto the
/// filename prefixes a later reencode step keys off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationTag {
    NoRotation,
    Clockwise90,
    CounterClockwise90,
    Clockwise90VerticalFlip,
    Full180,
}

impl RotationTag {
    pub fn prefix(&self) -> &'static str {
        match self {
            RotationTag::NoRotation => "todo_0deg_",
            RotationTag::Clockwise90 => "todo_90deg_",
            RotationTag::CounterClockwise90 => "todo_90degCCW_",
            RotationTag::Clockwise90VerticalFlip => "todo_90degVert_",
            RotationTag::Full180 => "todo_180deg_",
        }
    }
}

/// One menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Tag(RotationTag),
    Skip,
    Replay,
    Quit,
}

/// Menu as shown to the user. Key 6 is intentionally unassigned.
pub const MENU: &[(&str, &str)] = &[
    ("1", "Do not rotate (reencode only)"),
    ("2", "Rotate 90 degrees clockwise"),
    ("3", "Rotate 90 degrees counter-clockwise"),
    ("4", "Rotate 90 degrees clockwise with vertical flip"),
    ("5", "Rotate 180 degrees"),
    ("7", "Skip this video"),
    ("8", "Replay the video"),
    ("9", "Quit"),
];

impl MenuAction {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "1" => Some(MenuAction::Tag(RotationTag::NoRotation)),
            "2" => Some(MenuAction::Tag(RotationTag::Clockwise90)),
            "3" => Some(MenuAction::Tag(RotationTag::CounterClockwise90)),
            "4" => Some(MenuAction::Tag(RotationTag::Clockwise90VerticalFlip)),
            "5" => Some(MenuAction::Tag(RotationTag::Full180)),
            "7" => Some(MenuAction::Skip),
            "8" => Some(MenuAction::Replay),
            "9" => Some(MenuAction::Quit),
            _ => None,
        }
    }
}

/// Keeps arguments that are existing `.mp4` files not yet tagged.
pub fn candidate_videos(filenames: &[String]) -> Vec<PathBuf> {
    filenames
        .iter()
        .map(PathBuf::from)
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some("mp4")
                && !file_name_has_tag(path)
        })
        .collect()
}

fn file_name_has_tag(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with(TAG_PREFIX))
        .unwrap_or(false)
}

/// Same path with the prefix prepended to the file name.
pub fn tagged_path(path: &Path, tag: RotationTag) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    path.with_file_name(format!("{}{}", tag.prefix(), file_name))
}

/// Shows the menu and reads selections until one is valid. End of
/// input counts as quitting.
pub fn prompt_for_selection<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<MenuAction> {
    loop {
        writeln!(output, "__________________________________________________")?;
        writeln!(output)?;
        for (key, description) in MENU {
            writeln!(output, "[{}]  {}", key, description)?;
        }
        writeln!(output)?;
        write!(output, "Please input selection: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(MenuAction::Quit);
        }
        match MenuAction::from_key(&line) {
            Some(action) => return Ok(action),
            None => writeln!(output, "Invalid selection.")?,
        }
    }
}

/// What a tagging session got through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub renamed: usize,
    pub skipped: usize,
    pub quit_early: bool,
}

/// Plays each video and renames it according to the user's selection.
///
/// A failing player is reported but still drops into the menu, so the
/// video can be skipped or tagged blind. Renames never overwrite: if
/// the tagged name already exists the video is left alone.
pub async fn run_session<P, R, W>(
    videos: &[PathBuf],
    player: &P,
    input: &mut R,
    output: &mut W,
) -> Result<SessionSummary>
where
    P: VideoPlayer,
    R: BufRead,
    W: Write,
{
    let mut summary = SessionSummary::default();

    'videos: for video in videos {
        loop {
            writeln!(output)?;
            writeln!(output, "Playing video: \"{}\"", video.display())?;
            if let Err(e) = player.play(video).await {
                tracing::error!("Player failed for \"{}\": {}", video.display(), e);
                writeln!(output, "[ERROR] {}", e)?;
            }

            match prompt_for_selection(input, output)? {
                MenuAction::Quit => {
                    summary.quit_early = true;
                    break 'videos;
                }
                MenuAction::Replay => continue,
                MenuAction::Skip => {
                    writeln!(output, "Skipping \"{}\" ..", video.display())?;
                    summary.skipped += 1;
                    break;
                }
                MenuAction::Tag(tag) => {
                    let new_path = tagged_path(video, tag);
                    if new_path.exists() {
                        writeln!(output, "File exists: \"{}\" .. Skipping.", new_path.display())?;
                        summary.skipped += 1;
                    } else {
                        writeln!(
                            output,
                            "Renaming \"{}\" to \"{}\" ..",
                            video.display(),
                            new_path.display()
                        )?;
                        match std::fs::rename(video, &new_path) {
                            Ok(()) => summary.renamed += 1,
                            Err(e) => {
                                tracing::error!(
                                    "Rename failed for \"{}\": {}",
                                    video.display(),
                                    e
                                );
                                writeln!(output, "[ERROR] {}", e)?;
                                summary.skipped += 1;
                            }
                        }
                    }
                    break;
                }
            }
        }
    }

    Ok(summary)
}

/// Plays videos through an external player binary.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// The default player, kept quiet so its output does not bury the menu.
    pub fn mplayer() -> Self {
        Self {
            program: "mplayer".to_string(),
            args: vec!["-really-quiet".to_string()],
        }
    }
}

impl VideoPlayer for CommandPlayer {
    async fn play(&self, path: &Path) -> Result<()> {
        tracing::debug!("Launching {} for \"{}\"", self.program, path.display());

        // stdin stays on the terminal so the player's own key handling works.
        let child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MediaError::ToolNotFound {
                tool: self.program.clone(),
                source: e,
            })?;

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(MediaError::ToolFailed {
                tool: self.program.clone(),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(())
    }
}
