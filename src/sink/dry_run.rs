use async_trait::async_trait;

use crate::sink::ListingSink;
use crate::types::CanonicalListing;

/// Logs listings instead of sending them. Every listing counts as sent.
#[derive(Clone, Default)]
pub struct DryRunSink;

impl DryRunSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ListingSink for DryRunSink {
    async fn forward(&self, listing: &CanonicalListing) -> bool {
        tracing::info!(
            token_id = %listing.token_id,
            price = %listing.price,
            seller = %listing.seller_address,
            order_hash = %listing.order_hash,
            image = ?listing.image,
            marketplace_contract = ?listing.marketplace_contract,
            "dry-run listing"
        );
        true
    }
}
