use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booktrack::infrastructure::AppState;
use booktrack::{config, db, server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booktrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize database
    let db = db::init_db(&config.database_url).await?;

    let app = server::build_router(AppState::new(db), &config);

    // Start server
    let listener = server::bind_listener(config.port).await?;
    tracing::info!("BookTrack app running at: http://localhost:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}
