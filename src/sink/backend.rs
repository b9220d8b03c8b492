use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{snippet, ForwardError};
use crate::sink::ListingSink;
use crate::types::CanonicalListing;

/// Posts listings to the backend's order ingestion endpoint.
#[derive(Clone)]
pub struct BackendSink {
    base_url: String,
    http: reqwest::Client,
}

impl BackendSink {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("build backend http client")?;
        Ok(Self { base_url, http })
    }

    fn order_url(&self) -> String {
        format!("{}/order", self.base_url.trim_end_matches('/'))
    }

    async fn try_forward(&self, listing: &CanonicalListing) -> Result<(), ForwardError> {
        let resp = self
            .http
            .post(self.order_url())
            .json(listing)
            .send()
            .await
            .map_err(ForwardError::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(ForwardError::Transport)?;
        if !status.is_success() {
            return Err(ForwardError::Status {
                status,
                body: snippet(&body, 512),
            });
        }

        parse_reply(&body)
    }
}

#[async_trait]
impl ListingSink for BackendSink {
    async fn forward(&self, listing: &CanonicalListing) -> bool {
        match self.try_forward(listing).await {
            Ok(()) => {
                tracing::debug!(
                    token_id = %listing.token_id,
                    order_hash = %listing.order_hash,
                    price = %listing.price,
                    "listing forwarded"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    token_id = %listing.token_id,
                    order_hash = %listing.order_hash,
                    error = %e,
                    "forward failed"
                );
                false
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct BackendReply {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default, alias = "error")]
    message: Option<String>,
}

fn parse_reply(body: &str) -> Result<(), ForwardError> {
    let reply: BackendReply = serde_json::from_str(body).map_err(|e| ForwardError::Malformed {
        reason: e.to_string(),
        body: snippet(body, 512),
    })?;

    match reply.success {
        Some(true) => Ok(()),
        _ => Err(ForwardError::Rejected(
            reply.message.unwrap_or_else(|| "no success flag".to_string()),
        )),
    }
}
