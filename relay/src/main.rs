use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocr_relay::api::{create_router, AppState};
use ocr_relay::config::{Config, EngineKind};
use ocr_relay::extract::Extractor;

#[derive(Parser)]
#[command(name = "ocr-relay")]
#[command(about = "HTTP relay that forwards image uploads to an external OCR engine")]
struct Args {
    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,

    /// Override the configured engine (container, service, or cli)
    #[arg(long)]
    engine: Option<EngineKind>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ocr_relay=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(engine) = args.engine {
        config.ocr.engine = engine;
    }

    tracing::info!("Initializing OCR engine: {}...", config.ocr.engine);
    let extractor = Extractor::new(&config.ocr)?;

    let state = AppState::new(config.clone(), extractor);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("OCR relay starting on http://{}", addr);
    tracing::info!("  Relay endpoint:  http://{}/api/ocr", addr);
    tracing::info!("  Engine endpoint: http://{}/ocr", addr);
    tracing::info!("  API docs:        http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
