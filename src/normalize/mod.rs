pub mod extract;

use std::fmt;

use rust_decimal::Decimal;

use crate::types::{CanonicalListing, RawOrder};
use extract::{first_match, first_present};

pub const UNKNOWN_SELLER: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingNftMeta,
    MissingTokenId,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingNftMeta => f.write_str("no token metadata"),
            SkipReason::MissingTokenId => f.write_str("no token id"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Listing(CanonicalListing),
    Skip(SkipReason),
}

/// Turns raw upstream orders into canonical listings.
///
/// Only a missing token is fatal for a record; every other field falls
/// back to a default. The result depends on nothing but the input order
/// and the marketplace contract fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    marketplace_contract: Option<String>,
}

impl Normalizer {
    pub fn new(marketplace_contract: Option<String>) -> Self {
        Self { marketplace_contract }
    }

    pub fn normalize(&self, raw: &RawOrder) -> Normalized {
        let Some(meta) = first_present(raw, extract::NFT_META) else {
            return Normalized::Skip(SkipReason::MissingNftMeta);
        };
        let Some(token_id) = first_match(meta, extract::TOKEN_ID) else {
            return Normalized::Skip(SkipReason::MissingTokenId);
        };

        let seller_address = first_match(raw, extract::MAKER)
            .map(|a| a.to_lowercase())
            .unwrap_or_else(|| UNKNOWN_SELLER.to_string());
        let order_hash = first_match(raw, extract::ORDER_HASH)
            .unwrap_or_else(|| format!("{}-{}", token_id, seller_address));
        let order_payload = first_present(raw, extract::ORDER_PAYLOAD)
            .unwrap_or(raw)
            .clone();

        Normalized::Listing(CanonicalListing {
            price: first_match(raw, extract::PRICE).unwrap_or(Decimal::ZERO),
            image: first_match(meta, extract::IMAGE),
            token_id,
            seller_address,
            order_payload,
            order_hash,
            marketplace_contract: self.marketplace_contract.clone(),
        })
    }
}
