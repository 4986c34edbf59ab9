use std::sync::Arc;

use lease_quote_core::EngineConfig;

use crate::offer_client::OfferDocumentService;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EngineConfig>,
    pub offer_service: Arc<dyn OfferDocumentService>,
}

impl AppState {
    pub fn new(engine: EngineConfig, offer_service: Arc<dyn OfferDocumentService>) -> Self {
        Self {
            engine: Arc::new(engine),
            offer_service,
        }
    }
}
