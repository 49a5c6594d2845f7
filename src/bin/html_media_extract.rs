use clap::Parser;
use mediabag::core::html_media::{self, EncodedImageScanner};
use mediabag::domain::model::WriteSummary;
use mediabag::utils::{logger, validation};
use mediabag::LocalStorage;

#[derive(Parser)]
#[command(name = "html-media-extract")]
#[command(about = "Extract base64 encoded images embedded in HTML documents")]
struct Args {
    /// HTML files to scan
    #[arg(required = true)]
    files: Vec<String>,

    /// Directory extracted images are written to
    #[arg(short, long, default_value = ".")]
    output_dir: String,

    /// Show what would be written without writing anything
    #[arg(short, long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting HTML image extraction");

    if let Err(e) = validation::validate_path("output-dir", &args.output_dir) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // 先掃完所有文件,再一次解碼寫出
    let scanner = EncodedImageScanner::new();
    let mut found = Vec::new();

    for file in &args.files {
        let path = match validation::validate_input_file("FILE", file) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Skipping \"{}\": {}", file, e);
                continue;
            }
        };

        tracing::info!("📁 Processing file: \"{}\"", path.display());
        let html = match tokio::fs::read_to_string(&path).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Skipping \"{}\": {}", path.display(), e);
                continue;
            }
        };

        found.extend(scanner.scan(&html));
    }

    if found.is_empty() {
        println!("🔍 No encoded image data was found");
        return Ok(());
    }
    tracing::info!("📦 Found {} encoded image(s)", found.len());

    let storage = LocalStorage::new(args.output_dir.clone());
    let summary = html_media::decode_and_write(&storage, &found, args.dry_run).await;

    display_summary(&args, found.len(), &summary);

    if summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn display_summary(args: &Args, found: usize, summary: &WriteSummary) {
    println!();
    println!("📊 Extraction Summary:");
    println!("  Encoded images found: {}", found);

    if args.dry_run {
        println!("  🔍 DRY RUN - no files were written");
        return;
    }

    println!("  Images written: {}", summary.written);
    if summary.skipped > 0 {
        println!("  Skipped: {}", summary.skipped);
    }
    if summary.failed > 0 {
        println!("  ❌ Failed: {}", summary.failed);
    }
    println!("✅ All finished!");
}
