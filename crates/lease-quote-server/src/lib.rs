pub mod config;
pub mod error;
pub mod offer_client;
pub mod routes;
pub mod state;

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Settings;
use crate::offer_client::HttpOfferDocumentService;
use crate::state::AppState;

/// Bound listener plus the router it serves.
pub struct Application {
    listener: TcpListener,
    router: axum::Router,
}

impl Application {
    pub async fn build(settings: &Settings) -> Result<Self> {
        let offer_service = HttpOfferDocumentService::new(&settings.offer_service)?;
        let state = AppState::new(settings.engine.clone(), Arc::new(offer_service));
        let router = routes::router(state, &settings.application.cors_allowed_origins);

        let listener = TcpListener::bind(settings.bind_address()).await?;
        info!(address = %listener.local_addr()?, "listening");
        Ok(Self { listener, router })
    }

    pub fn port(&self) -> Result<u16> {
        Ok(self.listener.local_addr()?.port())
    }

    pub async fn run(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
