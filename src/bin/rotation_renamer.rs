use clap::Parser;
use mediabag::core::rotation::{self, CommandPlayer};
use mediabag::utils::logger;

#[derive(Parser)]
#[command(name = "rotation-renamer")]
#[command(about = "Preview videos and tag them with a rotation prefix for later reencoding")]
struct Args {
    /// Video files to preview (*.mp4; already tagged files are skipped)
    #[arg(required = true)]
    filenames: Vec<String>,

    /// Player command used for previews
    #[arg(long, default_value = "mplayer")]
    player: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    let videos = rotation::candidate_videos(&args.filenames);
    if videos.is_empty() {
        println!("🔍 No matching *.mp4 files to process");
        return Ok(());
    }
    tracing::info!("🎬 {} video(s) queued for review", videos.len());

    let player = if args.player == "mplayer" {
        CommandPlayer::mplayer()
    } else {
        CommandPlayer::new(args.player.clone())
    };

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    let summary = rotation::run_session(&videos, &player, &mut input, &mut output).await?;

    println!();
    println!("📊 Session Summary:");
    println!("  Renamed: {}", summary.renamed);
    println!("  Skipped: {}", summary.skipped);
    if summary.quit_early {
        println!("  ⏹️ Session ended early");
    }
    println!("✅ All finished!");

    Ok(())
}
