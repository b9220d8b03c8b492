use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Settings;
use crate::error::{snippet, FetchError};
use crate::source::ListingSource;
use crate::types::ListingPage;

const API_KEY_HEADER: &str = "X-API-KEY";

/// Active sell listings of one collection from the OpenSea orders API.
pub struct OpenSeaListings {
    base_url: String,
    chain: String,
    protocol: String,
    collection: String,
    api_key: String,
    page_size: usize,
    http: reqwest::Client,
}

impl OpenSeaListings {
    pub fn new(s: &Settings) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("build opensea http client")?;

        tracing::debug!(
            chain = %s.chain,
            collection = %s.collection_address,
            api_key_len = s.api_key.len(),
            "OpenSeaListings initialized"
        );
        Ok(Self {
            base_url: s.opensea_base_url.clone(),
            chain: s.chain.clone(),
            protocol: s.order_protocol.clone(),
            collection: s.collection_address.clone(),
            api_key: s.api_key.clone(),
            page_size: s.page_size,
            http,
        })
    }

    fn listings_url(&self) -> String {
        format!(
            "{}/orders/{}/{}/listings",
            self.base_url.trim_end_matches('/'),
            self.chain,
            self.protocol
        )
    }
}

#[async_trait]
impl ListingSource for OpenSeaListings {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<ListingPage, FetchError> {
        let url = self.listings_url();
        let limit = self.page_size.to_string();

        let mut req = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[
                ("limit", limit.as_str()),
                ("asset_contract_address", self.collection.as_str()),
            ]);
        if let Some(c) = cursor {
            req = req.query(&[("cursor", c)]);
        }

        tracing::debug!(url = %url, cursor = ?cursor, "fetching listings page");

        let resp = req.send().await.map_err(FetchError::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(FetchError::Transport)?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: snippet(&body, 512),
            });
        }

        parse_orders_page(&body)
    }
}

fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct OrdersResp {
    #[serde(default, deserialize_with = "vec_or_empty")]
    orders: Vec<Value>,
    #[serde(default, alias = "next_cursor", alias = "cursor")]
    next: Option<String>,
}

pub(crate) fn parse_orders_page(body: &str) -> Result<ListingPage, FetchError> {
    let resp: OrdersResp = serde_json::from_str(body).map_err(|e| FetchError::Decode {
        reason: e.to_string(),
        body: snippet(body, 2048),
    })?;

    Ok(ListingPage {
        orders: resp.orders,
        next: resp.next.filter(|c| !c.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvSettings;
    use crate::testing::{dead_base_url, OneShot};
    use serde_json::json;

    fn settings_for(base_url: &str) -> Settings {
        let raw: EnvSettings = serde_json::from_value(json!({
            "nft_contract_address": "0xcollection",
            "opensea_api_key": "key",
            "opensea_base_url": base_url,
            "chain": "base",
        }))
        .unwrap();
        raw.validate().unwrap()
    }

    #[test]
    fn listings_url_includes_chain_and_protocol() {
        let src = OpenSeaListings::new(&settings_for("https://api.example/v2/")).unwrap();
        assert_eq!(
            src.listings_url(),
            "https://api.example/v2/orders/base/seaport/listings"
        );
    }

    #[tokio::test]
    async fn fetch_sends_key_limit_collection_and_cursor() {
        let server = OneShot::start("200 OK", r#"{"orders":[{"order_hash":"0x1"}],"next":null}"#).await;
        let src = OpenSeaListings::new(&settings_for(&server.base_url)).unwrap();

        let page = src.fetch_page(Some("abc")).await.unwrap();
        assert_eq!(page.orders.len(), 1);
        assert_eq!(page.next, None);

        let req = server.request().await;
        let request_line = req.lines().next().unwrap();
        assert!(request_line.starts_with("GET /orders/base/seaport/listings?"), "{req}");
        assert!(request_line.contains("limit=50"), "{req}");
        assert!(request_line.contains("asset_contract_address=0xcollection"), "{req}");
        assert!(request_line.contains("cursor=abc"), "{req}");
        assert!(req.to_ascii_lowercase().contains("x-api-key: key"), "{req}");
    }

    #[tokio::test]
    async fn first_page_has_no_cursor_param() {
        let server = OneShot::start("200 OK", r#"{"orders":[]}"#).await;
        let src = OpenSeaListings::new(&settings_for(&server.base_url)).unwrap();

        src.fetch_page(None).await.unwrap();

        let req = server.request().await;
        assert!(!req.lines().next().unwrap().contains("cursor="), "{req}");
    }

    #[tokio::test]
    async fn non_success_status_is_a_status_error() {
        let server = OneShot::start("429 Too Many Requests", r#"{"detail":"slow down"}"#).await;
        let src = OpenSeaListings::new(&settings_for(&server.base_url)).unwrap();

        match src.fetch_page(None).await {
            Err(FetchError::Status { status, body }) => {
                assert_eq!(status.as_u16(), 429);
                assert!(body.contains("slow down"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        let src = OpenSeaListings::new(&settings_for(&dead_base_url().await)).unwrap();
        assert!(matches!(src.fetch_page(None).await, Err(FetchError::Transport(_))));
    }

    #[test]
    fn page_with_orders_and_cursor() {
        let page = parse_orders_page(r#"{"orders":[{"order_hash":"0x1"},{"order_hash":"0x2"}],"next":"abc"}"#)
            .unwrap();
        assert_eq!(page.orders.len(), 2);
        assert_eq!(page.orders[1], json!({ "order_hash": "0x2" }));
        assert_eq!(page.next.as_deref(), Some("abc"));
    }

    #[test]
    fn cursor_aliases_and_blank_cursor() {
        let page = parse_orders_page(r#"{"orders":[],"next_cursor":"xyz"}"#).unwrap();
        assert_eq!(page.next.as_deref(), Some("xyz"));

        let page = parse_orders_page(r#"{"orders":[],"next":""}"#).unwrap();
        assert_eq!(page.next, None);
    }

    #[test]
    fn missing_or_null_orders_is_an_empty_page() {
        let page = parse_orders_page(r#"{"orders":null,"next":null}"#).unwrap();
        assert!(page.orders.is_empty());
        assert!(page.next.is_none());

        let page = parse_orders_page("{}").unwrap();
        assert!(page.orders.is_empty());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = parse_orders_page("<html>rate limited</html>").unwrap_err();
        match err {
            FetchError::Decode { body, .. } => assert!(body.contains("rate limited")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
