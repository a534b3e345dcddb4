mod cleaner;
mod config;
mod embedding;
mod errors;
mod fetcher;
mod llm_client;
mod outreach;
mod portfolio;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::{EmbeddingProvider, TogetherEmbedding};
use crate::fetcher::{HttpPageFetcher, PageFetcher};
use crate::llm_client::LlmClient;
use crate::outreach::{OutreachModel, TogetherOutreach};
use crate::portfolio::index::VectorIndex;
use crate::portfolio::lance::LancePortfolioIndex;
use crate::portfolio::Portfolio;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing credential)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting coldreach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (single entry point for all completion calls)
    let llm = LlmClient::new(config.together_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let model: Arc<dyn OutreachModel> = Arc::new(TogetherOutreach::new(llm));

    // Initialize embedder (same credential as the completion client)
    let embedder: Arc<dyn EmbeddingProvider> =
        Arc::new(TogetherEmbedding::new(config.together_api_key.clone())?);
    info!(
        "Embedding provider initialized (model: {}, dimension: {})",
        embedding::EMBEDDING_MODEL,
        embedder.dimension()
    );

    // Initialize the persistent portfolio index
    let index: Arc<dyn VectorIndex> =
        Arc::new(LancePortfolioIndex::open(Path::new(&config.vectorstore_dir)).await?);
    info!("Vector index opened at {}", config.vectorstore_dir);

    // Load the portfolio CSV (fails on missing Techstack/Links columns).
    // Index population itself is deferred to the first request.
    let portfolio = Arc::new(Portfolio::from_csv(
        Path::new(&config.portfolio_csv),
        index,
        embedder,
    )?);
    info!(
        "Loaded {} portfolio entries from {}",
        portfolio.len(),
        config.portfolio_csv
    );
    if portfolio.is_empty() {
        tracing::warn!("Portfolio CSV has no rows; every skill query will come back empty");
    }

    let page_fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new()?);

    let state = AppState {
        fetcher: page_fetcher,
        model,
        portfolio,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
