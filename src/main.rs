use clap::Parser;

use signpost::logger::Logger;
use signpost::{serve, Config, PageError};

#[tokio::main]
async fn main() -> Result<(), PageError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = Config::parse();
    if !config.static_dir.exists() {
        log::warn!("Static directory {:?} does not exist, pages will use the inline shell", config.static_dir);
    }
    log::info!("Bookmarks from {}, shortcuts from {}", config.bookmarks, config.shortcuts);
    serve(config).await
}
