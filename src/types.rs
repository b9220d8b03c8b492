use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// Upstream order object. Its shape varies across API versions, so it stays untyped.
pub type RawOrder = Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalListing {
    pub token_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub seller_address: String,
    pub order_payload: Value,
    pub order_hash: String,
    pub image: Option<String>,
    pub marketplace_contract: Option<String>,
}

/// One page of upstream listings.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub orders: Vec<RawOrder>,
    pub next: Option<String>,
}
