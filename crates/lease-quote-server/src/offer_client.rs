//! Client for the external document service that renders offers and
//! optionally e-mails them.

use std::time::Duration;

use async_trait::async_trait;
use lease_quote_core::lease::offer::{OfferDocument, OfferRequest};
use lease_quote_core::{LeaseQuoteError, LeaseQuoteResult};
use tracing::{debug, instrument};

use crate::config::OfferServiceSettings;

#[async_trait]
pub trait OfferDocumentService: Send + Sync {
    /// Render (and possibly deliver) the offer, returning the encoded document.
    async fn render(&self, request: &OfferRequest) -> LeaseQuoteResult<OfferDocument>;
}

pub struct HttpOfferDocumentService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpOfferDocumentService {
    pub fn new(settings: &OfferServiceSettings) -> LeaseQuoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| LeaseQuoteError::Upstream(format!("HTTP client setup failed: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{}/documents/offer", settings.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl OfferDocumentService for HttpOfferDocumentService {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn render(&self, request: &OfferRequest) -> LeaseQuoteResult<OfferDocument> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| LeaseQuoteError::Upstream(format!("Document service unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LeaseQuoteError::Upstream(format!(
                "Document service returned {status}: {body}"
            )));
        }

        let document: OfferDocument = response.json().await.map_err(|e| {
            LeaseQuoteError::Upstream(format!("Document service response unreadable: {e}"))
        })?;
        debug!(email_status = ?document.email_status, "offer document rendered");
        Ok(document)
    }
}
