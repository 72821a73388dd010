use fluxgate::{
    config::Config,
    logger::{self, LoggerConfig},
    server,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = logger::init_with_config(LoggerConfig::development()) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    // Load .env before anything reads the environment
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    let config = Config::from_env();

    // Report credential presence without printing the value
    if config.router.has_token() {
        let token = &config.router.api_token;
        log::info!("✅ HF_TOKEN found in environment");
        log::debug!("Token starts with: {}...", &token[..5.min(token.len())]);
    } else {
        log::warn!("⚠️  HF_TOKEN is not set, upstream calls will fail to authenticate");
    }

    log::info!("🤖 Image model: {}", config.router.model);
    log::debug!("Router endpoint: {}", config.router.endpoint);

    logger::log_startup_info(
        "fluxgate",
        env!("CARGO_PKG_VERSION"),
        &config.host,
        config.port,
    );

    server::run(config).await
}
