//! HTTP client for a remote trade desk.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::store::TradeDesk;
use super::types::{TradeProposal, TradeRecord};
use crate::error::DeskError;

/// Trade desk reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTradeDesk {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTradeDesk {
    /// Create a client for the desk at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, DeskError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the desk base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read<T: DeserializeOwned>(
        &self,
        id: Option<&str>,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DeskError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(DeskError::NotFound(id.to_string()));
            }
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeskError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TradeDesk for HttpTradeDesk {
    #[instrument(skip(self, proposal), fields(symbol = %proposal.symbol, side = %proposal.side))]
    async fn propose(&self, proposal: &TradeProposal) -> Result<TradeRecord, DeskError> {
        proposal.validate()?;

        let url = format!("{}/trades/propose", self.base_url);
        let record: TradeRecord = self.read(None, self.http.post(&url).json(proposal)).await?;

        debug!(id = %record.id, "Desk accepted proposal");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<TradeRecord, DeskError> {
        let url = format!("{}/trades/{}", self.base_url, id);
        self.read(Some(id), self.http.get(&url)).await
    }

    #[instrument(skip(self))]
    async fn confirm(&self, id: &str) -> Result<TradeRecord, DeskError> {
        let url = format!("{}/trades/{}/confirm", self.base_url, id);
        self.read(Some(id), self.http.post(&url)).await
    }

    #[instrument(skip(self))]
    async fn cancel(&self, id: &str) -> Result<TradeRecord, DeskError> {
        let url = format!("{}/trades/{}/cancel", self.base_url, id);
        self.read(Some(id), self.http.post(&url)).await
    }
}
