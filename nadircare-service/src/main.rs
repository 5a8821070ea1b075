use nadircare_service::{Config, create_app};
use tokio::net::TcpListener;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let dotenv = dotenvy::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match dotenv {
        Ok(path) => info!("Loaded .env file from: {}", path.display()),
        Err(_) => info!("No .env file found, using process environment"),
    }

    let config = Config::from_env();
    if config.api_key.is_none() {
        warn!("OPENROUTER_API_KEY not set: image uploads will fail and text uploads return mock data");
    }

    let app = create_app(&config)?;
    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    let addr = listener.local_addr()?;

    info!("NadirCare API starting on {}", addr);
    info!("Vision model: {}, text model: {}", config.vision_model, config.text_model);
    info!("Health check endpoint: http://{}/health", addr);
    info!("Upload endpoint: POST http://{}/upload", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
