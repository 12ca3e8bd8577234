// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use docsearch_agent::app::{create_router, AppState, VERSION};
use docsearch_agent::models::config::AgentConfig;
use docsearch_agent::services::fetcher::CorpusClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docsearch_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::from_env();
    let cross_origin = config
        .cross_origin_url
        .parse()
        .expect("CROSS_ORIGIN_URL must be a valid header value");

    let state = AppState {
        corpus_client: Arc::new(CorpusClient::new(config.api_url.clone())),
        cross_origin,
    };
    let app = create_router(state);

    // Bind to 0.0.0.0 to accept connections from any network interface (required for Docker)
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    tracing::info!("docsearch-agent v{} listening on {}", VERSION, addr);
    tracing::info!("serving search over corpus at {}", config.api_url);

    axum::serve(listener, app).await.unwrap();
}
