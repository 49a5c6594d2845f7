use std::path::PathBuf;

use clap::Parser;
use mediabag::core::exif;
use mediabag::utils::{logger, validation};

#[derive(Parser)]
#[command(name = "exif-batch")]
#[command(about = "Batch-read image metadata through exiftool")]
struct Args {
    /// Image files to read (anything exiftool understands)
    #[arg(required = true)]
    files: Vec<String>,

    /// Metadata tags to display (comma separated)
    #[arg(short, long, value_delimiter = ',', default_value = exif::DEFAULT_TAG)]
    tags: Vec<String>,

    /// Also export the listing as CSV to this path
    #[arg(long)]
    csv: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting exiftool batch read");

    // 驗證輸入檔,但把使用者給的原始路徑傳給 exiftool,
    // SourceFile 欄位才不會變成冗長的絕對路徑
    let mut files = Vec::new();
    for file in &args.files {
        match validation::validate_input_file("FILE", file) {
            Ok(_) => files.push(PathBuf::from(file)),
            Err(e) => tracing::warn!("Skipping \"{}\": {}", file, e),
        }
    }

    if files.is_empty() {
        eprintln!("❌ No readable input files");
        eprintln!("💡 Check the paths passed on the command line");
        std::process::exit(1);
    }

    tracing::info!("📡 Reading metadata for {} file(s)", files.len());
    let records = match exif::read_metadata_batch(&files).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("exiftool batch read failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    println!("{}", exif::format_table(&records, &args.tags));

    if let Some(csv_path) = &args.csv {
        let file = std::fs::File::create(csv_path)?;
        exif::export_csv(&records, &args.tags, file)?;
        println!("📄 CSV exported to: {}", csv_path);
    }

    Ok(())
}
