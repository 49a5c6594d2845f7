use std::path::PathBuf;

use clap::Parser;
use mediabag::core::vision::{self, DescribeResponse, VisionClient};
use mediabag::utils::validation::Validate;
use mediabag::utils::{logger, validation};
use mediabag::VisionConfig;

#[derive(Parser)]
#[command(name = "vision-caption")]
#[command(about = "Describe images with the cloud vision API")]
struct Args {
    /// Image files or directories of images (directories are not recursed)
    #[arg(required = true)]
    paths: Vec<String>,

    /// API subscription key (falls back to VISION_API_KEY, then the config file)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Describe endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// TOML configuration file with an [api] section
    #[arg(short, long)]
    config: Option<String>,

    /// Number of caption candidates to request
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Print the raw JSON response for every image
    #[arg(short, long)]
    dump: bool,

    /// Do not print the per-image caption line
    #[arg(long)]
    no_caption: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting vision caption tool");

    // 載入設定檔(選用)
    let config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match VisionConfig::from_file(path) {
                Ok(config) => {
                    if let Err(e) = config.validate() {
                        eprintln!("❌ {}", e);
                        eprintln!("💡 {}", e.recovery_suggestion());
                        std::process::exit(1);
                    }
                    Some(config)
                }
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => None,
    };

    // 金鑰來源順序: 參數 > 環境變數 > 設定檔
    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var(vision::API_KEY_ENV).ok())
        .or_else(|| config.as_ref().and_then(|c| c.api_key().map(String::from)));
    let api_key = match api_key {
        Some(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("❌ No API key configured");
            eprintln!(
                "💡 Pass --api-key, set {}, or point --config at a TOML file with an [api] key",
                vision::API_KEY_ENV
            );
            std::process::exit(1);
        }
    };

    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.endpoint().map(String::from)))
        .unwrap_or_else(|| vision::DEFAULT_ENDPOINT.to_string());
    if let Err(e) = validation::validate_url("endpoint", &endpoint) {
        eprintln!("❌ {}", e);
        eprintln!("💡 The endpoint must be an http(s) URL");
        std::process::exit(1);
    }

    let max_candidates = args
        .max_candidates
        .or_else(|| config.as_ref().and_then(|c| c.max_candidates()))
        .unwrap_or(1);
    if let Err(e) = validation::validate_range("max_candidates", max_candidates, 1, 10) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // 展開檔案與目錄
    let mut roots = Vec::new();
    for raw in &args.paths {
        match validation::validate_file_or_dir("PATH", raw) {
            Ok(_) => roots.push(PathBuf::from(raw)),
            Err(e) => tracing::warn!("Skipping \"{}\": {}", raw, e),
        }
    }

    let images = vision::collect_images(&roots);
    if images.is_empty() {
        println!("🔍 No images to describe");
        return Ok(());
    }
    tracing::info!("🖼️ {} image(s) queued", images.len());

    let client = VisionClient::new(endpoint, api_key, max_candidates);
    let mut captioned = 0usize;
    let mut failed = 0usize;

    for image in &images {
        tracing::info!("📡 Querying API with image: \"{}\"", image.display());

        let bytes = match tokio::fs::read(image).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Skipping \"{}\": {}", image.display(), e);
                failed += 1;
                continue;
            }
        };

        // 單張失敗不影響整批
        let raw = match client.describe_raw(bytes).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("API call failed for \"{}\": {}", image.display(), e);
                eprintln!("❌ \"{}\": {}", image.display(), e);
                failed += 1;
                continue;
            }
        };

        if args.dump {
            println!("{}", serde_json::to_string_pretty(&raw)?);
        }

        let response: DescribeResponse = match serde_json::from_value(raw) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    "Unexpected response shape for \"{}\": {}",
                    image.display(),
                    e
                );
                failed += 1;
                continue;
            }
        };

        match response.caption() {
            Some(caption) => {
                if !args.no_caption {
                    let name = image
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| image.display().to_string());
                    println!("\"{}\": {}", name, caption);
                }
                captioned += 1;
            }
            None => {
                tracing::warn!("No caption returned for \"{}\"", image.display());
                failed += 1;
            }
        }
    }

    println!();
    println!("📊 Caption Summary:");
    println!("  Images captioned: {}", captioned);
    if failed > 0 {
        println!("  ❌ Failed: {}", failed);
        std::process::exit(1);
    }
    println!("✅ All finished!");

    Ok(())
}
