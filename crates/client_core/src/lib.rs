use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::PartnerRecord, error::FetchError, protocol::decode_partner_document};
use tracing::{debug, info};
use url::Url;

pub mod config;
pub mod filter;
pub mod form;
pub mod page;
pub mod sort;
pub mod table;

pub use config::{load_settings, Settings};
pub use form::FilterForm;
pub use page::{FetchOutcome, LoadState, PageController, RequestToken};
pub use sort::{SortAction, SortDirection, SortState};

/// Anything that can produce the full partner dataset.
#[async_trait]
pub trait PartnerSource: Send + Sync {
    async fn fetch_partners(&self) -> Result<Vec<PartnerRecord>, FetchError>;
}

/// Fetches the partner document with a single GET to a fixed URL.
#[derive(Clone)]
pub struct HttpPartnerSource {
    http: Client,
    url: Url,
}

impl HttpPartnerSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Ok(Self { http, url })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let url = settings.parsed_data_url()?;
        Ok(Self::new(url, settings.request_timeout())?)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PartnerSource for HttpPartnerSource {
    async fn fetch_partners(&self) -> Result<Vec<PartnerRecord>, FetchError> {
        debug!(url = %self.url, "fetching partner document");
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let partners = decode_partner_document(&body)?;
        info!(url = %self.url, count = partners.len(), "fetched partner document");
        Ok(partners)
    }
}

/// In-memory source, handy for tests and offline demos.
#[derive(Debug, Clone, Default)]
pub struct StaticPartnerSource {
    partners: Vec<PartnerRecord>,
}

impl StaticPartnerSource {
    pub fn new(partners: Vec<PartnerRecord>) -> Self {
        Self { partners }
    }
}

#[async_trait]
impl PartnerSource for StaticPartnerSource {
    async fn fetch_partners(&self) -> Result<Vec<PartnerRecord>, FetchError> {
        Ok(self.partners.clone())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
