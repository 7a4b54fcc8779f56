use dotenv::dotenv;
use tracing::{info, warn};

use cotizador_backend::app::app::App;
use cotizador_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file before anything reads them
    let dotenv_result = dotenv();

    let _logger = Logger::new().expect("Failed to initialize logging");

    info!("🚀 Starting Cotizador Backend - Grupo M&E");

    match dotenv_result {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = App::new().await;
    app.start().await;
}
