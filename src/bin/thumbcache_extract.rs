use clap::Parser;
use mediabag::core::thumbcache;
use mediabag::domain::model::WriteSummary;
use mediabag::utils::{logger, validation};
use mediabag::LocalStorage;

#[derive(Parser)]
#[command(name = "thumbcache-extract")]
#[command(about = "Extract embedded JPEG images from Android thumbnail cache files")]
struct Args {
    /// Thumbnail cache files to scan (e.g. .thumbdata3--1967290299)
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

    tracing::info!("🚀 Starting thumbnail cache extraction");

    if let Err(e) = validation::validate_path("output-dir", &args.output_dir) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let storage = LocalStorage::new(args.output_dir.clone());
    let mut totals = WriteSummary::default();
    let mut scanned = 0usize;

    for file in &args.files {
        // 壞的輸入檔跳過,不中斷整批
        let path = match validation::validate_input_file("FILE", file) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Skipping \"{}\": {}", file, e);
                continue;
            }
        };

        tracing::info!("📁 Processing file: \"{}\"", path.display());
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Skipping \"{}\": {}", path.display(), e);
                continue;
            }
        };

        totals.merge(thumbcache::extract_to_storage(&data, &storage, args.dry_run).await);
        scanned += 1;
    }

    if scanned == 0 {
        eprintln!("❌ No readable input files");
        eprintln!("💡 Check the paths passed on the command line");
        std::process::exit(1);
    }

    display_summary(&args, scanned, &totals);

    if totals.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn display_summary(args: &Args, scanned: usize, totals: &WriteSummary) {
    println!();
    println!("📊 Extraction Summary:");
    println!("  Files scanned: {}", scanned);

    if args.dry_run {
        println!("  🔍 DRY RUN - no files were written");
        return;
    }

    println!("  Images written: {}", totals.written);
    if totals.skipped > 0 {
        println!("  Skipped: {}", totals.skipped);
    }
    if totals.failed > 0 {
        println!("  ❌ Failed: {}", totals.failed);
    }
    if totals.written > 0 {
        println!(
            "✅ Extracted {} image(s) to {}",
            totals.written, args.output_dir
        );
    }
}
