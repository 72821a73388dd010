use std::path::PathBuf;

use clap::Parser;
use fluxgate::{
    logger::{self, LogLevel, LoggerConfig},
    GatewayError, Result, SubmitterClient,
};

#[derive(Parser, Debug)]
#[command(
    name = "fluxgate-cli",
    version,
    about = "Submit a prompt to a running fluxgate proxy and save the image"
)]
struct Args {
    /// Prompt describing the image to generate
    prompt: String,

    /// Base URL of the running proxy
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    proxy: String,

    /// Directory the image is saved into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Save whatever came back without checking that it decodes
    #[arg(long)]
    no_verify: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    if let Err(e) = logger::init_with_config(LoggerConfig::new().with_level(level)) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run(args).await {
        log::error!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let client = SubmitterClient::new(args.proxy.clone());

    log::info!("🎨 Requesting image from {}", args.proxy);
    let mut reference = client.submit(&args.prompt).await?;

    if args.no_verify {
        log::warn!("⚠️  Skipping the decode check");
    } else {
        let loaded = client.load_image(&reference).await?;
        log::info!("🖼️  Image decoded at {}x{}", loaded.width, loaded.height);
        // The check may have relabeled the reference; save the one that
        // actually decoded.
        reference = loaded.reference;
    }

    if !args.out_dir.exists() {
        std::fs::create_dir_all(&args.out_dir)
            .map_err(|e| GatewayError::DownloadError(e.to_string()))?;
    }

    let path = client
        .download_to(&reference, &args.prompt, &args.out_dir)
        .await?;
    log::info!("✅ Saved to {}", path.display());

    Ok(())
}
