use std::net::SocketAddr;
use std::sync::Arc;

mod handlers;
mod models;
mod state;
mod upload;

use entract_core::TextExtractor;
use entract_ner::{NerClient, NerConfig};
use entract_ocr_tesseract::TesseractOcr;
use entract_pdf_mupdf::MupdfBackend;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "entract=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if !TesseractOcr::is_available() {
        tracing::warn!("tesseract not found on PATH; scanned PDF pages will fail to extract");
    }

    let ner_config = NerConfig::from_env();
    tracing::info!(
        endpoint = %ner_config.endpoint,
        model = %ner_config.model,
        "using NER inference endpoint"
    );

    let state = Arc::new(AppState {
        extractor: TextExtractor::new(Arc::new(MupdfBackend::new()), Arc::new(TesseractOcr::new())),
        recognizer: Arc::new(NerClient::new(ner_config)?),
    });

    // Cap uploads at 20MB
    let body_limit = axum::extract::DefaultBodyLimit::max(20 * 1024 * 1024);

    let app = axum::Router::new()
        .route("/analyze", axum::routing::post(handlers::analyze::analyze))
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = std::env::var("ENTRACT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
